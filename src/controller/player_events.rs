//! Device events and background work completions

use std::time::Instant;

use crate::model::Tab;
use crate::session::{DeviceEvent, ResumeOutcome};
use super::{AppController, ControlMessage};

impl AppController {
    /// Forward one device event into the session, then let the player react
    pub async fn handle_device_event(&mut self, event: DeviceEvent, now: Instant) {
        tracing::trace!(?event, "Device event");
        let index = {
            let mut session = self.session.lock().await;
            session.handle_device_event(event);
            session.current_index()
        };
        if let Some(index) = index {
            if self.model.active_tab() != Tab::NowPlaying {
                self.model.select_now_playing(index);
            }
        }
        self.player.pump(now).await;
    }

    pub async fn handle_message(&mut self, message: ControlMessage, now: Instant) {
        match message {
            ControlMessage::Scanned { path, focus, result } => {
                self.handle_scan_result(path, focus, result);
            }
            ControlMessage::Resumed(ResumeOutcome::Resumed { track, index, position_ms }) => {
                tracing::info!(track = %track.name, index, position_ms, "Resumed last session");
                self.model.select_now_playing(index);
                if let Some(folder) = track.path.parent() {
                    self.open_folder(folder.to_path_buf(), Some(track.path.clone()));
                }
                self.switch_tab(Tab::Player, now).await;
            }
            ControlMessage::Resumed(ResumeOutcome::NoState) => {
                tracing::debug!("Nothing to resume");
                let browser = &self.model.browser;
                if browser.location().is_none() && browser.loading().is_none() {
                    self.show_roots();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use super::*;
    use crate::session::{MediaLocator, ResumeRecord};
    use crate::test_support::{audio, video, DeviceCall};
    use std::path::Path;

    #[tokio::test]
    async fn test_end_of_media_advances_and_player_follows() {
        let mut h = harness(vec![]);
        let now = Instant::now();
        h.controller
            .session
            .lock()
            .await
            .load_playlist(vec![video("/m/a.mp4"), audio("/m/b.mp3")], 0, None);
        h.controller.switch_tab(Tab::Player, now).await;
        assert!(h.controller.is_immersive());

        let locator = MediaLocator::from_path(Path::new("/m/a.mp4"));
        h.controller
            .handle_device_event(DeviceEvent::EndOfMedia { locator: locator.clone() }, now)
            .await;
        assert_eq!(h.controller.session.lock().await.current_index(), Some(1));
        assert!(!h.controller.is_immersive());
        assert_eq!(h.controller.player().snapshot().index, Some(1));

        // stale duplicate for the finished track
        h.controller
            .handle_device_event(DeviceEvent::EndOfMedia { locator }, now)
            .await;
        assert_eq!(h.controller.session.lock().await.current_index(), Some(1));
    }

    #[tokio::test]
    async fn test_device_error_surfaces_on_tick() {
        let mut h = harness(vec![]);
        let now = Instant::now();
        h.controller
            .session
            .lock()
            .await
            .load_playlist(vec![audio("/m/a.mp3")], 0, None);
        h.controller.switch_tab(Tab::Player, now).await;

        h.controller
            .handle_device_event(
                DeviceEvent::Error {
                    locator: MediaLocator::from_path(Path::new("/m/a.mp3")),
                    message: "decoder failed".to_string(),
                },
                now,
            )
            .await;
        h.controller.tick(now).await;

        assert_eq!(
            h.controller.model().ui_state.error_message.as_deref(),
            Some("a.mp3 is unavailable: decoder failed")
        );
    }

    #[tokio::test]
    async fn test_resume_switches_to_player() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, vec![0u8; 10]).unwrap();

        let mut h = harness(vec![]);
        *h.store.record.lock().unwrap() = Some(ResumeRecord::new(path.clone(), 7_000, None));
        h.controller.start_resume();

        let message = h.messages.recv().await.unwrap();
        h.controller.handle_message(message, Instant::now()).await;

        assert_eq!(h.controller.model().active_tab(), Tab::Player);
        assert_eq!(h.device.calls().last(), Some(&DeviceCall::Seek(7_000)));
        assert_eq!(h.controller.model().browser.loading(), Some(dir.path()));
    }

    #[tokio::test]
    async fn test_no_resume_state_shows_roots() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = harness(vec![dir.path().to_path_buf()]);
        h.controller.start_resume();

        let message = h.messages.recv().await.unwrap();
        h.controller.handle_message(message, Instant::now()).await;

        assert_eq!(h.controller.model().active_tab(), Tab::Browser);
        assert_eq!(h.controller.model().browser.entries().len(), 1);
    }
}
