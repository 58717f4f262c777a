//! Ordered track list with a single cursor

use std::path::{Path, PathBuf};

use crate::media::Track;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Playlist state owned by the session
///
/// `cursor` is `Some` exactly when `tracks` is non-empty.
#[derive(Clone, Debug, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: Option<usize>,
    origin_folder: Option<PathBuf>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole playlist, clamping `start_index` into range
    pub fn load(&mut self, tracks: Vec<Track>, start_index: usize, origin_folder: Option<PathBuf>) {
        self.cursor = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        self.tracks = tracks;
        self.origin_folder = origin_folder;
    }

    /// Move the cursor to `track`; returns false (cursor untouched) when absent
    pub fn select_by_identity(&mut self, track: &Track) -> bool {
        match self.position_of(&track.path) {
            Some(index) => {
                self.cursor = Some(index);
                true
            }
            None => false,
        }
    }

    /// Step the cursor with wraparound at both ends
    pub fn advance(&mut self, direction: Direction) {
        let len = self.tracks.len();
        let Some(cursor) = self.cursor else {
            return;
        };

        self.cursor = Some(match direction {
            Direction::Next => (cursor + 1) % len,
            Direction::Previous => (cursor + len - 1) % len,
        });
    }

    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|index| self.tracks.get(index))
    }

    pub fn index(&self) -> Option<usize> {
        self.cursor
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn origin_folder(&self) -> Option<&Path> {
        self.origin_folder.as_deref()
    }

    pub fn position_of(&self, path: &Path) -> Option<usize> {
        self.tracks.iter().position(|track| track.path == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{audio, video};

    fn sample() -> Vec<Track> {
        vec![audio("/m/a.mp3"), video("/m/b.mp4"), audio("/m/c.wav")]
    }

    #[test]
    fn test_load_clamps_start_index() {
        let mut playlist = Playlist::new();
        playlist.load(sample(), 99, None);
        assert_eq!(playlist.index(), Some(2));
        assert_eq!(playlist.current().unwrap().name, "c.wav");

        playlist.load(sample(), 0, Some(PathBuf::from("/m")));
        assert_eq!(playlist.index(), Some(0));
        assert_eq!(playlist.origin_folder(), Some(Path::new("/m")));
    }

    #[test]
    fn test_empty_load_has_no_cursor() {
        let mut playlist = Playlist::new();
        playlist.load(sample(), 1, None);
        playlist.load(vec![], 3, None);
        assert_eq!(playlist.index(), None);
        assert!(playlist.current().is_none());

        playlist.advance(Direction::Next);
        playlist.advance(Direction::Previous);
        assert_eq!(playlist.index(), None);
    }

    #[test]
    fn test_next_wraps_around_after_len_steps() {
        for len in 1..6 {
            let tracks: Vec<Track> = (0..len).map(|i| audio(&format!("/m/{i}.mp3"))).collect();
            for start in 0..len {
                let mut playlist = Playlist::new();
                playlist.load(tracks.clone(), start, None);
                for _ in 0..len {
                    playlist.advance(Direction::Next);
                }
                assert_eq!(playlist.index(), Some(start));
            }
        }
    }

    #[test]
    fn test_previous_inverts_next() {
        for start in 0..3 {
            let mut playlist = Playlist::new();
            playlist.load(sample(), start, None);
            playlist.advance(Direction::Next);
            playlist.advance(Direction::Previous);
            assert_eq!(playlist.index(), Some(start));

            playlist.advance(Direction::Previous);
            playlist.advance(Direction::Next);
            assert_eq!(playlist.index(), Some(start));
        }
    }

    #[test]
    fn test_previous_from_first_wraps_to_last() {
        let mut playlist = Playlist::new();
        playlist.load(sample(), 0, None);
        playlist.advance(Direction::Previous);
        assert_eq!(playlist.index(), Some(2));
    }

    #[test]
    fn test_advance_scenario_mixed_kinds() {
        let mut playlist = Playlist::new();
        playlist.load(sample(), 0, None);

        playlist.advance(Direction::Next);
        assert_eq!(playlist.index(), Some(1));
        assert!(playlist.current().unwrap().is_video());

        playlist.advance(Direction::Next);
        assert_eq!(playlist.current().unwrap().name, "c.wav");

        playlist.advance(Direction::Next);
        assert_eq!(playlist.index(), Some(0));
        assert_eq!(playlist.current().unwrap().name, "a.mp3");
    }

    #[test]
    fn test_select_by_identity() {
        let mut playlist = Playlist::new();
        playlist.load(sample(), 0, None);

        assert!(playlist.select_by_identity(&audio("/m/c.wav")));
        assert_eq!(playlist.index(), Some(2));

        assert!(!playlist.select_by_identity(&audio("/elsewhere/c.wav")));
        assert_eq!(playlist.index(), Some(2));
    }
}
