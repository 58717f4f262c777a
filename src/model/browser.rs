//! Folder browser state

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::media::{MediaFolder, MediaScanner, Track};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BrowserEntry {
    Folder(MediaFolder),
    File(Track),
}

impl BrowserEntry {
    pub fn name(&self) -> &str {
        match self {
            BrowserEntry::Folder(folder) => &folder.name,
            BrowserEntry::File(track) => &track.name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            BrowserEntry::Folder(folder) => &folder.path,
            BrowserEntry::File(track) => &track.path,
        }
    }
}

/// One level of a directory: sub-folders, then media files
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FolderListing {
    pub path: PathBuf,
    pub folders: Vec<MediaFolder>,
    pub files: Vec<Track>,
}

impl FolderListing {
    /// Blocking; run through `spawn_blocking`
    pub fn scan(scanner: &dyn MediaScanner, path: &Path) -> Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            folders: scanner.list_folders(path)?,
            files: scanner.list_media_files(path)?,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct BrowserState {
    /// `None` while the storage roots are shown
    location: Option<PathBuf>,
    roots: Vec<MediaFolder>,
    entries: Vec<BrowserEntry>,
    files: Vec<Track>,
    selected: usize,
    loading: Option<PathBuf>,
}

impl BrowserState {
    pub fn show_roots(&mut self, roots: Vec<MediaFolder>) {
        let previous = self.location.take();
        self.roots = roots;
        self.entries = self.roots.iter().cloned().map(BrowserEntry::Folder).collect();
        self.files.clear();
        self.loading = None;
        self.selected = previous
            .and_then(|path| self.entries.iter().position(|e| e.path() == path))
            .unwrap_or(0);
    }

    /// Replace the entries with a finished scan, keeping `focus` selected when present
    pub fn show_listing(&mut self, listing: FolderListing, focus: Option<&Path>) {
        self.loading = None;
        self.entries = listing
            .folders
            .into_iter()
            .map(BrowserEntry::Folder)
            .chain(listing.files.iter().cloned().map(BrowserEntry::File))
            .collect();
        self.files = listing.files;
        self.location = Some(listing.path);
        self.selected = focus
            .and_then(|path| self.entries.iter().position(|e| e.path() == path))
            .unwrap_or(0);
    }

    pub fn set_loading(&mut self, path: &Path) {
        self.loading = Some(path.to_path_buf());
    }

    pub fn loading(&self) -> Option<&Path> {
        self.loading.as_deref()
    }

    pub fn cancel_loading(&mut self) {
        self.loading = None;
    }

    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    pub fn entries(&self) -> &[BrowserEntry] {
        &self.entries
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&BrowserEntry> {
        self.entries.get(self.selected)
    }

    /// Media files of the current folder, in listing order
    pub fn files(&self) -> &[Track] {
        &self.files
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Where Backspace leads: `Some(None)` for the roots, `None` when already there
    pub fn parent_location(&self) -> Option<Option<PathBuf>> {
        let location = self.location.as_deref()?;
        if self.roots.iter().any(|root| root.path == location) {
            return Some(None);
        }
        Some(location.parent().map(Path::to_path_buf))
    }
}
