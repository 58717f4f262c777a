//! Playback session coordinator
//!
//! One `Session` exists per process. It is created explicitly at start-up and
//! handed to every screen as a `SessionHandle`. All mutation happens on the
//! control loop; methods are synchronous and never wait on I/O other than the
//! write-through of the resume record.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::media::{MediaScanner, Track};
use super::device::{DeviceEvent, MediaLocator, PlaybackDevice};
use super::events::{ListenerRegistry, SessionEvent, SessionListener, SubscriptionId};
use super::playlist::{Direction, Playlist};
use super::store::{ResumeRecord, ResumeStore};

pub type SessionHandle = Arc<Mutex<Session>>;

/// Result of a resume attempt
#[derive(Clone, Debug, PartialEq)]
pub enum ResumeOutcome {
    Resumed { track: Track, index: usize, position_ms: u64 },
    NoState,
}

/// A validated resume record plus the folder that has to be re-scanned
#[derive(Clone, Debug, PartialEq)]
pub struct ResumePlan {
    pub record: ResumeRecord,
    pub scan_folder: PathBuf,
}

pub struct Session {
    playlist: Playlist,
    device: Option<Box<dyn PlaybackDevice>>,
    loaded: Option<MediaLocator>,
    listeners: ListenerRegistry,
    store: Box<dyn ResumeStore>,
    scanner: Arc<dyn MediaScanner>,
}

impl Session {
    pub fn new(store: Box<dyn ResumeStore>, scanner: Arc<dyn MediaScanner>) -> Self {
        Self {
            playlist: Playlist::new(),
            device: None,
            loaded: None,
            listeners: ListenerRegistry::default(),
            store,
            scanner,
        }
    }

    pub fn into_handle(self) -> SessionHandle {
        Arc::new(Mutex::new(self))
    }

    // ========================================================================
    // Device lifecycle
    // ========================================================================

    /// Attach the playback device, releasing any previous one
    pub fn attach(&mut self, device: Box<dyn PlaybackDevice>) {
        self.detach();
        tracing::info!("Playback device attached");
        self.device = Some(device);
    }

    pub fn detach(&mut self) {
        if let Some(mut device) = self.device.take() {
            device.release();
            tracing::info!("Playback device released");
        }
        self.loaded = None;
    }

    pub fn has_device(&self) -> bool {
        self.device.is_some()
    }

    /// Detach the device and drop every listener. Safe to call repeatedly;
    /// the session behaves as empty-state until a device is attached again.
    pub fn release(&mut self) {
        self.detach();
        self.listeners.clear();
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    pub fn subscribe(&mut self, listener: Arc<dyn SessionListener>) -> SubscriptionId {
        let id = self.listeners.subscribe(listener);
        tracing::debug!(?id, "Listener subscribed");
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        if self.listeners.unsubscribe(id) {
            tracing::debug!(?id, "Listener unsubscribed");
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ========================================================================
    // Playlist commands
    // ========================================================================

    pub fn load_playlist(&mut self, tracks: Vec<Track>, start_index: usize, origin_folder: Option<PathBuf>) {
        tracing::info!(
            tracks = tracks.len(),
            start_index,
            folder = ?origin_folder,
            "Loading playlist"
        );
        self.playlist.load(tracks, start_index, origin_folder);

        if !self.playlist.is_empty() {
            self.start_playback();
        }

        self.listeners
            .notify(&SessionEvent::PlaylistChanged(self.playlist.tracks().to_vec()));
    }

    /// Play `track` if it belongs to the current playlist, otherwise do nothing
    pub fn play_track(&mut self, track: &Track) {
        if self.playlist.select_by_identity(track) {
            self.start_playback();
        } else {
            tracing::debug!(path = %track.path.display(), "Track not in playlist, ignoring");
        }
    }

    pub fn play_adjacent(&mut self, direction: Direction) {
        if self.playlist.is_empty() {
            return;
        }
        self.playlist.advance(direction);
        self.start_playback();
    }

    fn start_playback(&mut self) {
        let Some(track) = self.playlist.current().cloned() else {
            return;
        };
        let index = self.playlist.index().unwrap_or(0);
        let locator = MediaLocator::from_path(&track.path);

        match self.device.as_mut() {
            Some(device) => {
                device.load(&locator);
                device.prepare();
                device.play();
                self.loaded = Some(locator);
            }
            None => tracing::warn!("No playback device attached, track selected but not started"),
        }

        tracing::info!(track = %track.name, index, video = track.is_video(), "Track changed");
        self.listeners.notify(&SessionEvent::TrackChanged { track, index });
        self.save_resume_record();
    }

    // ========================================================================
    // Device pass-through
    // ========================================================================

    pub fn toggle_play_pause(&mut self) {
        if let Some(device) = self.device.as_mut() {
            if device.is_playing() {
                device.pause();
            } else {
                device.play();
            }
        }
    }

    pub fn seek_to(&mut self, position_ms: u64) {
        if let Some(device) = self.device.as_mut() {
            device.seek(position_ms);
        }
    }

    /// Relative seek clamped into `[0, duration]`
    pub fn seek_by(&mut self, delta_ms: i64) {
        let position = self.current_position() as i64;
        let duration = self.duration() as i64;
        let target = (position + delta_ms).min(duration).max(0);
        self.seek_to(target as u64);
    }

    pub fn current_position(&self) -> u64 {
        self.device.as_ref().map(|d| d.position()).unwrap_or(0)
    }

    pub fn duration(&self) -> u64 {
        self.device.as_ref().map(|d| d.duration()).unwrap_or(0)
    }

    pub fn is_playing(&self) -> bool {
        self.device.as_ref().map(|d| d.is_playing()).unwrap_or(false)
    }

    /// Feed one event from the device's channel into the session
    pub fn handle_device_event(&mut self, event: DeviceEvent) {
        match event {
            DeviceEvent::EndOfMedia { locator } => {
                if self.loaded.as_ref() != Some(&locator) {
                    tracing::debug!(%locator, "Ignoring end of media for a track no longer loaded");
                    return;
                }
                tracing::debug!(%locator, "End of media, advancing");
                self.play_adjacent(Direction::Next);
            }
            DeviceEvent::PlayingStateChanged(is_playing) => {
                tracing::debug!(is_playing, "Playing state changed");
                self.listeners
                    .notify(&SessionEvent::PlayingStateChanged(is_playing));
            }
            DeviceEvent::Error { locator, message } => {
                tracing::warn!(%locator, %message, "Track unavailable");
                let track = self
                    .playlist
                    .position_of(locator.path())
                    .and_then(|index| self.playlist.tracks().get(index).cloned());
                self.listeners
                    .notify(&SessionEvent::TrackUnavailable { track, message });
            }
        }
    }

    // ========================================================================
    // Navigation host queries
    // ========================================================================

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.playlist.index()
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn origin_folder(&self) -> Option<&Path> {
        self.playlist.origin_folder()
    }

    pub fn is_playing_video(&self) -> bool {
        self.current_track().map(|t| t.is_video()).unwrap_or(false)
    }

    // ========================================================================
    // Resume
    // ========================================================================

    /// Persist the current track and device position
    pub fn save_resume_record(&mut self) {
        let Some(track) = self.playlist.current() else {
            return;
        };
        let record = ResumeRecord::new(
            track.path.clone(),
            self.current_position(),
            self.playlist.origin_folder().map(Path::to_path_buf),
        );

        match self.store.put(&record) {
            Ok(()) => tracing::trace!(path = %record.path.display(), position_ms = record.position_ms, "Resume record saved"),
            Err(e) => tracing::warn!(error = %e, "Failed to save resume record"),
        }
    }

    pub fn has_resumable_state(&self) -> bool {
        match self.store.get() {
            Ok(record) => record.is_some(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read resume record");
                false
            }
        }
    }

    /// Read and validate the resume record. A record whose file is gone is
    /// discarded.
    pub fn prepare_resume(&mut self) -> Option<ResumePlan> {
        let record = match self.store.get() {
            Ok(Some(record)) => record,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable resume record");
                self.clear_resume_record();
                return None;
            }
        };

        let scan_folder = record.path.parent().map(Path::to_path_buf);
        match scan_folder {
            Some(scan_folder) if record.path.is_file() => Some(ResumePlan { record, scan_folder }),
            _ => {
                tracing::info!(path = %record.path.display(), "Last played file is gone, discarding resume record");
                self.clear_resume_record();
                None
            }
        }
    }

    /// Load a freshly scanned folder at the recorded track and seek to the
    /// recorded position
    pub fn apply_resume(&mut self, plan: ResumePlan, tracks: Vec<Track>) -> ResumeOutcome {
        let Some(index) = tracks.iter().position(|t| t.path == plan.record.path) else {
            tracing::info!(path = %plan.record.path.display(), "Last played file not found in folder scan");
            return ResumeOutcome::NoState;
        };

        let origin_folder = plan
            .record
            .folder
            .filter(|folder| folder.is_dir())
            .unwrap_or(plan.scan_folder);
        let track = tracks[index].clone();
        let position_ms = plan.record.position_ms;

        self.load_playlist(tracks, index, Some(origin_folder));
        self.seek_to(position_ms);
        self.save_resume_record();

        tracing::info!(track = %track.name, index, position_ms, "Playback resumed");
        ResumeOutcome::Resumed { track, index, position_ms }
    }

    /// Resume synchronously, scanning with the session's own scanner
    #[allow(dead_code)]
    pub fn resume(&mut self) -> ResumeOutcome {
        let Some(plan) = self.prepare_resume() else {
            return ResumeOutcome::NoState;
        };

        match self.scanner.list_media_files(&plan.scan_folder) {
            Ok(tracks) => self.apply_resume(plan, tracks),
            Err(e) => {
                tracing::warn!(error = %e, folder = %plan.scan_folder.display(), "Resume scan failed");
                ResumeOutcome::NoState
            }
        }
    }

    pub fn scanner(&self) -> Arc<dyn MediaScanner> {
        self.scanner.clone()
    }

    fn clear_resume_record(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear resume record");
        }
    }
}

/// Resume with the folder scan on the blocking pool. The session lock is not
/// held while scanning; the result is applied under the lock afterwards.
pub async fn resume_in_background(handle: &SessionHandle) -> ResumeOutcome {
    let (plan, scanner) = {
        let mut session = handle.lock().await;
        match session.prepare_resume() {
            Some(plan) => (plan, session.scanner()),
            None => return ResumeOutcome::NoState,
        }
    };

    let folder = plan.scan_folder.clone();
    let scanned = tokio::task::spawn_blocking(move || scanner.list_media_files(&folder)).await;

    match scanned {
        Ok(Ok(tracks)) => handle.lock().await.apply_resume(plan, tracks),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, folder = %plan.scan_folder.display(), "Resume scan failed");
            ResumeOutcome::NoState
        }
        Err(e) => {
            tracing::error!(error = %e, "Resume scan task panicked");
            ResumeOutcome::NoState
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("playlist", &self.playlist)
            .field("has_device", &self.has_device())
            .field("loaded", &self.loaded)
            .field("listeners", &self.listeners)
            .finish()
    }
}
