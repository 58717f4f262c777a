//! Tracks and folders resolved from filesystem entries

use std::fs;
use std::path::{Path, PathBuf};

use super::formats::{extension_of, is_supported, MediaKind};

/// One playable media file
///
/// The absolute path is the track's identity. Tracks are only ever built from
/// an existing, supported file, so holding one means the file was valid when
/// it was scanned (it may have disappeared since).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    /// File name including extension, shown in lists
    pub name: String,
    /// File name without extension, shown as the now-playing title
    pub title: String,
    pub extension: String,
    pub kind: MediaKind,
    pub size: u64,
}

impl Track {
    pub fn from_path(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        let extension = extension_of(path);
        let kind = MediaKind::from_extension(&extension)?;
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

        Some(Self {
            name: file_name(&path),
            title: path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            extension,
            kind,
            size: metadata.len(),
            path,
        })
    }

    pub fn is_video(&self) -> bool {
        self.kind.is_video()
    }

    /// Same underlying file, regardless of when either side was scanned
    pub fn same_identity(&self, other: &Track) -> bool {
        self.path == other.path
    }

    pub fn formatted_size(&self) -> String {
        let kb = self.size as f64 / 1024.0;
        let mb = kb / 1024.0;
        let gb = mb / 1024.0;
        if gb >= 1.0 {
            format!("{:.1} GB", gb)
        } else if mb >= 1.0 {
            format!("{:.1} MB", mb)
        } else {
            format!("{:.0} KB", kb)
        }
    }
}

/// A browsable directory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaFolder {
    pub path: PathBuf,
    pub name: String,
    /// Supported media files directly inside the folder
    pub media_file_count: usize,
}

impl MediaFolder {
    pub fn from_path(path: &Path) -> Option<Self> {
        if !path.is_dir() {
            return None;
        }

        let media_file_count = fs::read_dir(path)
            .map(|entries| {
                entries
                    .filter_map(|entry| entry.ok())
                    .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
                    .filter(|entry| is_supported(&entry.path()))
                    .count()
            })
            .unwrap_or(0);

        Some(Self {
            name: file_name(path),
            path: path.to_path_buf(),
            media_file_count,
        })
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_from_supported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Road Trip.MP3");
        fs::write(&path, vec![0u8; 2048]).unwrap();

        let track = Track::from_path(&path).unwrap();
        assert_eq!(track.name, "Road Trip.MP3");
        assert_eq!(track.title, "Road Trip");
        assert_eq!(track.extension, "mp3");
        assert_eq!(track.kind, MediaKind::Audio);
        assert_eq!(track.size, 2048);
        assert!(track.path.is_absolute());
        assert_eq!(track.formatted_size(), "2 KB");
    }

    #[test]
    fn test_invalid_entries_never_become_tracks() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("notes.txt");
        fs::write(&text, b"hello").unwrap();
        let folder = dir.path().join("album.mp3");
        fs::create_dir(&folder).unwrap();

        assert!(Track::from_path(&text).is_none());
        assert!(Track::from_path(&folder).is_none());
        assert!(Track::from_path(&dir.path().join("missing.mp4")).is_none());
    }

    #[test]
    fn test_formatted_size_units() {
        let mut track = Track {
            path: PathBuf::from("/v/a.mp4"),
            name: "a.mp4".to_string(),
            title: "a".to_string(),
            extension: "mp4".to_string(),
            kind: MediaKind::Video,
            size: 5 * 1024 * 1024 + 512 * 1024,
        };
        assert_eq!(track.formatted_size(), "5.5 MB");
        track.size = 3 * 1024 * 1024 * 1024;
        assert_eq!(track.formatted_size(), "3.0 GB");
    }

    #[test]
    fn test_folder_counts_only_media_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        fs::write(dir.path().join("b.mkv"), b"x").unwrap();
        fs::write(dir.path().join("cover.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();

        let folder = MediaFolder::from_path(dir.path()).unwrap();
        assert_eq!(folder.media_file_count, 2);
        assert!(MediaFolder::from_path(&dir.path().join("a.mp3")).is_none());
    }
}
