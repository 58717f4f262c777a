//! Tabs and folder browser navigation

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::model::{BrowserEntry, FolderListing, Tab};
use crate::session::resume_in_background;
use super::{AppController, ControlMessage};

impl AppController {
    /// Switch tabs. Entering the player subscribes it to the session; leaving
    /// it restores the chrome and saves the resume record.
    pub async fn switch_tab(&mut self, tab: Tab, now: Instant) {
        let previous = self.model.active_tab();
        if previous == tab {
            return;
        }

        if previous == Tab::Player {
            self.player.exit().await;
        }
        self.model.set_active_tab(tab);
        tracing::debug!(from = ?previous, to = ?tab, "Tab switched");

        match tab {
            Tab::Player => self.player.enter(now).await,
            Tab::Browser => self.jump_to_origin_folder().await,
            Tab::NowPlaying => {
                if let Some(index) = self.session.lock().await.current_index() {
                    self.model.select_now_playing(index);
                }
            }
        }
    }

    /// While something plays, the browser opens on the folder it came from
    pub async fn jump_to_origin_folder(&mut self) {
        let (origin, current) = {
            let session = self.session.lock().await;
            if !session.is_playing() {
                return;
            }
            (
                session.origin_folder().map(Path::to_path_buf),
                session.current_track().map(|t| t.path.clone()),
            )
        };

        if let Some(origin) = origin {
            if self.model.browser.location() != Some(origin.as_path()) {
                self.open_folder(origin, current);
            }
        }
    }

    pub fn show_roots(&mut self) {
        let roots = self.storage_roots();
        tracing::debug!(roots = roots.len(), "Showing storage roots");
        self.model.browser.show_roots(roots);
    }

    /// Scan `path` on the blocking pool; the listing arrives as a `ControlMessage`
    pub fn open_folder(&mut self, path: PathBuf, focus: Option<PathBuf>) {
        self.model.browser.set_loading(&path);

        let scanner = self.scanner.clone();
        let messages = self.messages.clone();
        tokio::spawn(async move {
            let scan_path = path.clone();
            let result = tokio::task::spawn_blocking(move || FolderListing::scan(scanner.as_ref(), &scan_path))
                .await
                .map_err(|e| format!("Folder scan failed: {}", e))
                .and_then(|scanned| scanned.map_err(|e| Self::format_error(&e)));

            if messages.send(ControlMessage::Scanned { path, focus, result }).is_err() {
                tracing::debug!("Scan finished after the control loop stopped");
            }
        });
    }

    pub fn handle_scan_result(
        &mut self,
        path: PathBuf,
        focus: Option<PathBuf>,
        result: Result<FolderListing, String>,
    ) {
        // A newer navigation superseded this scan
        if self.model.browser.loading() != Some(path.as_path()) {
            tracing::debug!(path = %path.display(), "Dropping stale folder scan");
            return;
        }

        match result {
            Ok(listing) => {
                tracing::debug!(
                    path = %path.display(),
                    folders = listing.folders.len(),
                    files = listing.files.len(),
                    "Folder scanned"
                );
                self.model.browser.show_listing(listing, focus.as_deref());
            }
            Err(message) => {
                tracing::warn!(path = %path.display(), %message, "Folder scan failed");
                self.model.browser.cancel_loading();
                self.model.set_error(message);
            }
        }
    }

    pub fn browser_parent(&mut self) {
        let current = self.model.browser.location().map(Path::to_path_buf);
        match self.model.browser.parent_location() {
            Some(Some(parent)) => self.open_folder(parent, current),
            Some(None) => self.show_roots(),
            None => {}
        }
    }

    /// Enter on a folder navigates into it; Enter on a file plays the folder
    pub async fn activate_browser_entry(&mut self, now: Instant) {
        let Some(entry) = self.model.browser.selected_entry().cloned() else {
            return;
        };

        match entry {
            BrowserEntry::Folder(folder) => self.open_folder(folder.path, None),
            BrowserEntry::File(track) => self.play_from_browser(&track, now).await,
        }
    }

    /// Resume the last session off the control loop
    pub fn start_resume(&self) {
        let session = self.session.clone();
        let messages = self.messages.clone();
        tokio::spawn(async move {
            let outcome = resume_in_background(&session).await;
            if messages.send(ControlMessage::Resumed(outcome)).is_err() {
                tracing::debug!("Resume finished after the control loop stopped");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::harness;
    use super::*;
    use crate::test_support::audio;

    fn media_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("Albums")).unwrap();
        std::fs::write(dir.path().join("b.mp3"), vec![0u8; 10]).unwrap();
        std::fs::write(dir.path().join("A.mp4"), vec![0u8; 10]).unwrap();
        dir
    }

    async fn next_scan(h: &mut super::super::tests::Harness) {
        match h.messages.recv().await.unwrap() {
            ControlMessage::Scanned { path, focus, result } => {
                h.controller.handle_scan_result(path, focus, result)
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_open_folder_lists_folders_then_files() {
        let dir = media_dir();
        let mut h = harness(vec![dir.path().to_path_buf()]);

        h.controller.open_folder(dir.path().to_path_buf(), None);
        next_scan(&mut h).await;

        let names: Vec<String> = h
            .controller
            .model
            .browser
            .entries()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["Albums", "A.mp4", "b.mp3"]);
    }

    #[tokio::test]
    async fn test_parent_of_root_returns_to_roots() {
        let dir = media_dir();
        let mut h = harness(vec![dir.path().to_path_buf()]);
        h.controller.show_roots();
        h.controller.open_folder(dir.path().to_path_buf(), None);
        next_scan(&mut h).await;

        h.controller.browser_parent();
        assert_eq!(h.controller.model.browser.location(), None);
        assert_eq!(h.controller.model.browser.entries().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_folder_sets_error() {
        let mut h = harness(vec![]);
        h.controller.open_folder(PathBuf::from("/no/such/folder"), None);
        next_scan(&mut h).await;

        assert!(h.controller.model.ui_state.error_message.is_some());
        assert!(h.controller.model.browser.loading().is_none());
    }

    #[tokio::test]
    async fn test_stale_scan_is_dropped() {
        let dir = media_dir();
        let mut h = harness(vec![]);
        h.controller.open_folder(dir.path().to_path_buf(), None);
        h.controller.model.browser.set_loading(Path::new("/elsewhere"));
        next_scan(&mut h).await;

        assert!(h.controller.model.browser.entries().is_empty());
    }

    #[tokio::test]
    async fn test_browser_jumps_to_origin_while_playing() {
        let dir = media_dir();
        let mut h = harness(vec![]);
        let now = Instant::now();
        let track = audio(dir.path().join("b.mp3").to_str().unwrap());
        h.controller
            .session
            .lock()
            .await
            .load_playlist(vec![track.clone()], 0, Some(dir.path().to_path_buf()));

        h.controller.switch_tab(Tab::NowPlaying, now).await;
        h.controller.switch_tab(Tab::Browser, now).await;
        next_scan(&mut h).await;

        assert_eq!(h.controller.model.browser.location(), Some(dir.path()));
        assert_eq!(
            h.controller.model.browser.selected_entry().map(|e| e.path().to_path_buf()),
            Some(track.path)
        );
    }

    #[tokio::test]
    async fn test_leaving_player_restores_chrome() {
        let mut h = harness(vec![]);
        let now = Instant::now();
        h.controller.session.lock().await.load_playlist(
            vec![crate::test_support::video("/m/clip.mp4")],
            0,
            None,
        );

        h.controller.switch_tab(Tab::Player, now).await;
        assert!(h.controller.is_immersive());
        assert!(h.controller.player.is_active());

        h.controller.switch_tab(Tab::NowPlaying, now).await;
        assert!(!h.controller.is_immersive());
        assert!(!h.controller.player.is_active());
        assert!(h.store.current().is_some());
    }

    #[tokio::test]
    async fn test_resume_completes_after_control_loop_stops() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mp3");
        std::fs::write(&path, vec![0u8; 10]).unwrap();

        let h = harness(vec![]);
        *h.store.record.lock().unwrap() =
            Some(crate::session::ResumeRecord::new(path, 4_000, None));
        let super::super::tests::Harness { controller, device, messages, .. } = h;
        drop(messages);
        controller.start_resume();

        let seeked = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while !device.calls().contains(&crate::test_support::DeviceCall::Seek(4_000)) {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await;
        assert!(seeked.is_ok());
        assert_eq!(controller.session.lock().await.current_index(), Some(0));
    }
}
