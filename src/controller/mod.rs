//! Controller module - application logic and event handling
//!
//! The controller is owned by the control loop and is the only thing that
//! mutates the model or the session. It is organized into submodules by
//! responsibility:
//!
//! - `input`: key and mouse handling
//! - `navigation`: tabs and the folder browser
//! - `playback`: playback commands
//! - `player_events`: device events, scan results and resume completion

mod input;
mod navigation;
mod playback;
mod player_events;

use std::path::PathBuf;
use std::time::Instant;
use ratatui::layout::Rect;
use tokio::sync::{mpsc::UnboundedSender, watch};

use crate::media::{MediaFolder, MediaScanner};
use crate::model::{AppModel, FolderListing, Tab};
use crate::screen::{PlayerScreen, PlayerScreenConfig, Visibility};
use crate::session::{ResumeOutcome, SessionHandle};
use std::sync::Arc;

/// Work finished off the control loop, reported back to it
#[derive(Debug)]
pub enum ControlMessage {
    Scanned {
        path: PathBuf,
        focus: Option<PathBuf>,
        result: Result<FolderListing, String>,
    },
    Resumed(ResumeOutcome),
}

pub struct AppController {
    pub(crate) model: AppModel,
    pub(crate) session: SessionHandle,
    pub(crate) scanner: Arc<dyn MediaScanner>,
    pub(crate) player: PlayerScreen<watch::Sender<Visibility>>,
    visibility: watch::Receiver<Visibility>,
    pub(crate) messages: UnboundedSender<ControlMessage>,
    pub(crate) screen_area: Rect,
    pub(crate) seek_step_ms: i64,
    /// Left button went down on the seek bar and has not been released
    pub(crate) seek_dragging: bool,
}

impl AppController {
    pub fn new(
        session: SessionHandle,
        scanner: Arc<dyn MediaScanner>,
        player_config: PlayerScreenConfig,
        messages: UnboundedSender<ControlMessage>,
    ) -> Self {
        let (chrome_tx, visibility) = watch::channel(Visibility::VISIBLE);
        let seek_step_ms = player_config.seek_step_ms as i64;
        Self {
            model: AppModel::new(),
            player: PlayerScreen::new(session.clone(), player_config, chrome_tx),
            session,
            scanner,
            visibility,
            messages,
            screen_area: Rect::default(),
            seek_step_ms,
            seek_dragging: false,
        }
    }

    pub fn model(&self) -> &AppModel {
        &self.model
    }

    pub fn player(&self) -> &PlayerScreen<watch::Sender<Visibility>> {
        &self.player
    }

    pub fn should_quit(&self) -> bool {
        self.model.should_quit()
    }

    /// Chrome as last reported by the player screen
    pub fn visibility(&self) -> Visibility {
        *self.visibility.borrow()
    }

    /// Chrome is only immersive while the player tab is showing
    pub fn is_immersive(&self) -> bool {
        self.model.active_tab() == Tab::Player && self.visibility().is_immersive()
    }

    pub fn set_screen_area(&mut self, area: Rect) {
        self.screen_area = area;
    }

    pub fn storage_roots(&self) -> Vec<MediaFolder> {
        self.scanner.storage_roots()
    }

    /// Per-frame housekeeping: session events, player timers, stale errors
    pub async fn tick(&mut self, now: Instant) {
        self.player.pump(now).await;
        self.player.tick(now).await;

        if let Some(message) = self.player.last_error().map(str::to_string) {
            self.player.clear_error();
            self.model.set_error(message);
        }
        self.model.auto_clear_old_errors();
    }

    /// Leave the player, persist the resume record and stop the device
    pub async fn shutdown(&mut self) {
        self.player.exit().await;
        let mut session = self.session.lock().await;
        session.save_resume_record();
        session.release();
        tracing::info!("Session released");
    }

    pub(crate) fn format_error(error: &crate::error::Error) -> String {
        match error {
            crate::error::Error::Io(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                "Permission denied. The folder cannot be read.".to_string()
            }
            crate::error::Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
                "Folder not found. Was the drive removed?".to_string()
            }
            other => format!("Error: {}", other),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::media::FsScanner;
    use crate::session::Session;
    use crate::test_support::{MemoryStore, RecordingDevice};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    pub(crate) struct Harness {
        pub controller: AppController,
        pub device: RecordingDevice,
        pub store: MemoryStore,
        pub messages: UnboundedReceiver<ControlMessage>,
    }

    pub(crate) fn harness(roots: Vec<PathBuf>) -> Harness {
        let store = MemoryStore::default();
        let scanner: Arc<dyn MediaScanner> = Arc::new(FsScanner::new(roots));
        let mut session = Session::new(Box::new(store.clone()), scanner.clone());
        let device = RecordingDevice::new(60_000);
        session.attach(Box::new(device.clone()));

        let (tx, messages) = mpsc::unbounded_channel();
        let mut controller = AppController::new(
            session.into_handle(),
            scanner,
            PlayerScreenConfig::default(),
            tx,
        );
        controller.set_screen_area(Rect::new(0, 0, 100, 30));
        Harness {
            controller,
            device,
            store,
            messages,
        }
    }

    #[test]
    fn test_format_error_messages() {
        let denied = crate::error::Error::Io(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(AppController::format_error(&denied).starts_with("Permission denied"));

        let corrupt = crate::error::Error::Store(serde_json::from_str::<u32>("{").unwrap_err());
        assert!(AppController::format_error(&corrupt).starts_with("Error: Resume store error"));
    }

    #[tokio::test]
    async fn test_shutdown_saves_and_releases() {
        let mut h = harness(vec![]);
        {
            let mut session = h.controller.session.lock().await;
            session.load_playlist(vec![crate::test_support::audio("/m/a.mp3")], 0, None);
        }
        h.device.set_position(4_000);

        h.controller.shutdown().await;
        assert_eq!(h.store.current().unwrap().position_ms, 4_000);
        assert_eq!(
            h.device.calls().last(),
            Some(&crate::test_support::DeviceCall::Release)
        );
    }
}
