//! Main application model with state management

use std::time::{Duration, Instant};

use super::browser::BrowserState;
use super::types::{Tab, UiState};

const ERROR_DISPLAY_TIME: Duration = Duration::from_secs(5);

/// Front-end state owned by the control loop
#[derive(Debug, Default)]
pub struct AppModel {
    pub ui_state: UiState,
    pub browser: BrowserState,
    should_quit: bool,
}

impl AppModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_should_quit(&mut self, quit: bool) {
        self.should_quit = quit;
    }

    pub fn active_tab(&self) -> Tab {
        self.ui_state.active_tab
    }

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.ui_state.active_tab = tab;
    }

    // ========================================================================
    // Now Playing selection
    // ========================================================================

    pub fn move_now_playing_up(&mut self) {
        self.ui_state.now_playing_selected = self.ui_state.now_playing_selected.saturating_sub(1);
    }

    pub fn move_now_playing_down(&mut self, track_count: usize) {
        if self.ui_state.now_playing_selected + 1 < track_count {
            self.ui_state.now_playing_selected += 1;
        }
    }

    pub fn select_now_playing(&mut self, index: usize) {
        self.ui_state.now_playing_selected = index;
    }

    // ========================================================================
    // Error & help overlays
    // ========================================================================

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.ui_state.error_message = Some(message.into());
        self.ui_state.error_timestamp = Some(Instant::now());
    }

    pub fn clear_error(&mut self) {
        self.ui_state.error_message = None;
        self.ui_state.error_timestamp = None;
    }

    pub fn auto_clear_old_errors(&mut self) {
        if let Some(timestamp) = self.ui_state.error_timestamp {
            if timestamp.elapsed() >= ERROR_DISPLAY_TIME {
                self.clear_error();
            }
        }
    }

    pub fn toggle_help(&mut self) {
        self.ui_state.show_help_popup = !self.ui_state.show_help_popup;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_playing_selection_bounds() {
        let mut model = AppModel::new();
        model.move_now_playing_up();
        assert_eq!(model.ui_state.now_playing_selected, 0);

        model.move_now_playing_down(2);
        model.move_now_playing_down(2);
        assert_eq!(model.ui_state.now_playing_selected, 1);
    }

    #[test]
    fn test_fresh_error_is_kept() {
        let mut model = AppModel::new();
        model.set_error("Folder unreadable");
        model.auto_clear_old_errors();
        assert_eq!(model.ui_state.error_message.as_deref(), Some("Folder unreadable"));

        model.clear_error();
        assert!(model.ui_state.error_message.is_none());
    }
}
