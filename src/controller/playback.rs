//! Playback control methods

use std::time::Instant;

use crate::media::Track;
use crate::model::{NowPlaying, Tab};
use crate::session::Direction;
use super::AppController;

impl AppController {
    pub async fn now_playing(&self) -> NowPlaying {
        let session = self.session.lock().await;
        NowPlaying {
            tracks: session.playlist().tracks().to_vec(),
            current: session.current_index(),
            is_playing: session.is_playing(),
        }
    }

    /// Load the browser's current folder as the playlist, starting at `track`
    pub async fn play_from_browser(&mut self, track: &Track, now: Instant) {
        let files = self.model.browser.files().to_vec();
        let Some(index) = files.iter().position(|t| t.same_identity(track)) else {
            return;
        };
        let origin = self.model.browser.location().map(|p| p.to_path_buf());

        self.session.lock().await.load_playlist(files, index, origin);
        self.model.select_now_playing(index);
        self.switch_tab(Tab::Player, now).await;
    }

    /// Enter in the Now Playing list
    pub async fn play_now_playing_selected(&mut self, now: Instant) {
        let index = self.model.ui_state.now_playing_selected;
        {
            let mut session = self.session.lock().await;
            let Some(track) = session.playlist().tracks().get(index).cloned() else {
                return;
            };
            session.play_track(&track);
        }
        self.switch_tab(Tab::Player, now).await;
    }

    pub async fn toggle_play_pause(&mut self, now: Instant) {
        if self.player.is_active() {
            self.player.toggle_play_pause(now).await;
        } else {
            self.session.lock().await.toggle_play_pause();
        }
    }

    pub async fn play_adjacent(&mut self, direction: Direction, now: Instant) {
        if self.player.is_active() {
            self.player.play_adjacent(now, direction).await;
        } else {
            self.session.lock().await.play_adjacent(direction);
        }
        if let Some(index) = self.session.lock().await.current_index() {
            self.model.select_now_playing(index);
        }
    }

    /// Keyboard stand-in for dragging the seek bar by `delta_ms`
    pub async fn seek_step(&mut self, delta_ms: i64, now: Instant) {
        let target = {
            let session = self.session.lock().await;
            let position = session.current_position() as i64;
            (position + delta_ms).clamp(0, session.duration() as i64) as u64
        };

        if self.player.is_active() {
            self.player.seek_bar_started();
            self.player.seek_bar_moved(target).await;
            self.player.seek_bar_finished(now);
        } else {
            self.session.lock().await.seek_to(target);
        }
    }
}
