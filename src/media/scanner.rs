//! Directory scanning
//!
//! Listings are always one level deep, hidden entries (dot-files) are skipped
//! and results are sorted by lower-cased name so that playlist order matches
//! what the browser shows.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use super::track::{MediaFolder, Track};

/// Directory listing collaborator
///
/// Implementations block on the filesystem; callers on the control loop run
/// them through `tokio::task::spawn_blocking`.
pub trait MediaScanner: Send + Sync {
    /// Browsable starting points
    fn storage_roots(&self) -> Vec<MediaFolder>;

    /// Sub-folders of `path`
    fn list_folders(&self, path: &Path) -> Result<Vec<MediaFolder>>;

    /// Supported media files directly inside `path`
    fn list_media_files(&self, path: &Path) -> Result<Vec<Track>>;
}

/// Scanner over the local filesystem
#[derive(Clone, Debug)]
pub struct FsScanner {
    roots: Vec<PathBuf>,
}

impl FsScanner {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    fn visible_entries(path: &Path) -> Result<Vec<PathBuf>> {
        let mut entries: Vec<PathBuf> = fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| !is_hidden(path))
            .collect();
        entries.sort_by_key(|path| sort_key(path));
        Ok(entries)
    }
}

impl MediaScanner for FsScanner {
    fn storage_roots(&self) -> Vec<MediaFolder> {
        let mut roots: Vec<MediaFolder> = Vec::new();
        for root in &self.roots {
            match MediaFolder::from_path(root) {
                Some(folder) if !roots.iter().any(|r| r.path == folder.path) => roots.push(folder),
                Some(_) => {}
                None => tracing::debug!(root = %root.display(), "Skipping unavailable storage root"),
            }
        }
        roots
    }

    fn list_folders(&self, path: &Path) -> Result<Vec<MediaFolder>> {
        let folders: Vec<MediaFolder> = Self::visible_entries(path)?
            .iter()
            .filter_map(|entry| MediaFolder::from_path(entry))
            .collect();
        tracing::debug!(path = %path.display(), count = folders.len(), "Listed folders");
        Ok(folders)
    }

    fn list_media_files(&self, path: &Path) -> Result<Vec<Track>> {
        let tracks: Vec<Track> = Self::visible_entries(path)?
            .iter()
            .filter_map(|entry| Track::from_path(entry))
            .collect();
        tracing::debug!(path = %path.display(), count = tracks.len(), "Listed media files");
        Ok(tracks)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}

fn sort_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"data").unwrap();
    }

    #[test]
    fn test_media_files_sorted_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "b.mp4");
        touch(dir.path(), "C.wav");
        touch(dir.path(), "a.MP3");
        touch(dir.path(), "lyrics.txt");
        touch(dir.path(), ".hidden.mp3");

        let scanner = FsScanner::new(vec![]);
        let names: Vec<String> = scanner
            .list_media_files(dir.path())
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["a.MP3", "b.mp4", "C.wav"]);
    }

    #[test]
    fn test_folders_exclude_hidden_and_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("Zeta")).unwrap();
        fs::create_dir(dir.path().join("alpha")).unwrap();
        fs::create_dir(dir.path().join(".thumbnails")).unwrap();
        touch(dir.path(), "song.mp3");

        let scanner = FsScanner::new(vec![]);
        let names: Vec<String> = scanner
            .list_folders(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["alpha", "Zeta"]);
    }

    #[test]
    fn test_unreadable_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = FsScanner::new(vec![]);
        assert!(scanner.list_media_files(&dir.path().join("gone")).is_err());
    }

    #[test]
    fn test_storage_roots_skip_missing_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let scanner = FsScanner::new(vec![
            dir.path().to_path_buf(),
            dir.path().join("missing"),
            dir.path().to_path_buf(),
        ]);
        let roots = scanner.storage_roots();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].path, dir.path());
    }
}
