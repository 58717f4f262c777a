//! Supported media formats

use std::path::Path;

pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mpg", "mpeg", "avi"];
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac"];

/// Whether a track is rendered on screen or only heard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Classify a lower-case extension, `None` if unsupported
    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Video)
        } else if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(MediaKind::Audio)
        } else {
            None
        }
    }

    pub fn is_video(self) -> bool {
        self == MediaKind::Video
    }
}

/// Lower-cased text after the last `.` of the file name, empty when there is none
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

pub fn is_supported(path: &Path) -> bool {
    MediaKind::from_extension(&extension_of(path)).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classifies_extensions_case_insensitively() {
        assert_eq!(MediaKind::from_extension("MP4"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("mpeg"), Some(MediaKind::Video));
        assert_eq!(MediaKind::from_extension("Flac"), Some(MediaKind::Audio));
        assert_eq!(MediaKind::from_extension("ogg"), None);
        assert_eq!(MediaKind::from_extension(""), None);
    }

    #[test]
    fn test_extension_of_uses_last_dot() {
        assert_eq!(extension_of(Path::new("/music/live.at.home.WAV")), "wav");
        assert_eq!(extension_of(Path::new("/music/README")), "");
        assert!(is_supported(Path::new("/video/clip.MKV")));
        assert!(!is_supported(Path::new("/video/notes.txt")));
    }
}
