//! View module - UI rendering
//!
//! - `utils`: formatting and scrollable lists
//! - `layout`: screen split, tab bar, status bar, player regions
//! - `content`: browser and Now Playing lists
//! - `progress`: player surface and seek bar
//! - `overlays`: error and help popups

mod utils;
mod layout;
mod content;
mod progress;
mod overlays;

use ratatui::Frame;

use crate::model::{AppModel, NowPlaying, Tab};
use crate::screen::{PlaybackSnapshot, TapMode, Visibility};

pub use layout::{player_regions, split_screen};

/// Everything one frame needs, gathered by the control loop
pub struct FrameState<'a> {
    pub model: &'a AppModel,
    pub now_playing: &'a NowPlaying,
    pub playback: &'a PlaybackSnapshot,
    pub visibility: Visibility,
    pub immersive: bool,
    pub tap_mode: TapMode,
}

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, state: &FrameState) {
        let model = state.model;
        let (tab_bar, content, status_bar) = split_screen(frame.area(), state.immersive);

        if let Some(area) = tab_bar {
            layout::render_tab_bar(frame, area, model.active_tab());
        }

        let playing_track = state
            .now_playing
            .current
            .and_then(|i| state.now_playing.tracks.get(i));

        match model.active_tab() {
            Tab::Browser => {
                content::render_browser(frame, content, &model.browser, playing_track.map(|t| t.path.as_path()))
            }
            Tab::NowPlaying => content::render_now_playing(
                frame,
                content,
                state.now_playing,
                model.ui_state.now_playing_selected,
            ),
            Tab::Player => progress::render_player(frame, content, state.playback, state.visibility, state.tap_mode),
        }

        if let Some(area) = status_bar {
            let status = match playing_track {
                Some(track) if state.now_playing.is_playing => format!("▶ {}", track.name),
                Some(track) => format!("⏸ {}", track.name),
                None => "Idle".to_string(),
            };
            layout::render_status_bar(frame, area, &status);
        }

        if model.ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, &model.ui_state);
        }

        if model.ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
