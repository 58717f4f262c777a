//! Core type definitions for the front-end

use std::time::Instant;

use crate::media::Track;

/// Which tab is on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Browser,
    NowPlaying,
    Player,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Browser, Tab::NowPlaying, Tab::Player];

    pub fn next(self) -> Self {
        match self {
            Tab::Browser => Tab::NowPlaying,
            Tab::NowPlaying => Tab::Player,
            Tab::Player => Tab::Browser,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Browser => Tab::Player,
            Tab::NowPlaying => Tab::Browser,
            Tab::Player => Tab::NowPlaying,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Tab::Browser => "Browser",
            Tab::NowPlaying => "Now Playing",
            Tab::Player => "Player",
        }
    }
}

/// UI state for the application
#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub active_tab: Tab,
    pub now_playing_selected: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

/// The session's playlist as the Now Playing tab shows it
#[derive(Clone, Debug, Default)]
pub struct NowPlaying {
    pub tracks: Vec<Track>,
    pub current: Option<usize>,
    pub is_playing: bool,
}
