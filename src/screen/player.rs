//! Player screen
//!
//! Owns the visibility machine, the progress-refresh timer and a subscription
//! to the session for as long as the screen is shown. Session events arrive on
//! a channel and are applied in `pump`, on the control loop.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::media::Track;
use crate::session::{ChannelListener, Direction, SessionEvent, SessionHandle, SubscriptionId};
use super::timer::PeriodicTimer;
use super::visibility::{
    ChromeHost, SeekDirection, TapOutcome, TapSide, Visibility, VisibilityConfig, VisibilityMachine,
};

pub const PROGRESS_REFRESH: Duration = Duration::from_millis(1000);
pub const SEEK_STEP_MS: u64 = 10_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerScreenConfig {
    pub visibility: VisibilityConfig,
    pub seek_step_ms: u64,
    pub progress_refresh: Duration,
}

impl Default for PlayerScreenConfig {
    fn default() -> Self {
        Self {
            visibility: VisibilityConfig::default(),
            seek_step_ms: SEEK_STEP_MS,
            progress_refresh: PROGRESS_REFRESH,
        }
    }
}

/// What the player view renders, refreshed on events and progress ticks
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackSnapshot {
    pub track: Option<Track>,
    pub index: Option<usize>,
    pub track_count: usize,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
}

impl PlaybackSnapshot {
    pub fn is_video(&self) -> bool {
        self.track.as_ref().map(|t| t.is_video()).unwrap_or(false)
    }
}

pub struct PlayerScreen<H: ChromeHost> {
    session: SessionHandle,
    config: PlayerScreenConfig,
    machine: VisibilityMachine<H>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
    subscription: Option<SubscriptionId>,
    progress: PeriodicTimer,
    snapshot: PlaybackSnapshot,
    last_error: Option<String>,
}

impl<H: ChromeHost> PlayerScreen<H> {
    pub fn new(session: SessionHandle, config: PlayerScreenConfig, host: H) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            session,
            machine: VisibilityMachine::new(config.visibility, host),
            progress: PeriodicTimer::new(config.progress_refresh),
            config,
            events_tx,
            events_rx,
            subscription: None,
            snapshot: PlaybackSnapshot::default(),
            last_error: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn visibility(&self) -> Visibility {
        self.machine.visibility()
    }

    pub fn machine(&self) -> &VisibilityMachine<H> {
        &self.machine
    }

    pub fn snapshot(&self) -> &PlaybackSnapshot {
        &self.snapshot
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub async fn enter(&mut self, now: Instant) {
        if self.is_active() {
            return;
        }

        // stale events from a previous visit
        while self.events_rx.try_recv().is_ok() {}

        let mut session = self.session.lock().await;
        let id = session.subscribe(Arc::new(ChannelListener(self.events_tx.clone())));
        self.subscription = Some(id);
        tracing::debug!(listeners = session.listener_count(), "Player screen subscribed");

        self.machine
            .enter(now, session.is_playing_video(), session.is_playing());
        self.progress.start(now);
        drop(session);

        self.refresh_snapshot().await;
    }

    /// Apply queued session events
    pub async fn pump(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }

        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            changed = true;
            match event {
                SessionEvent::TrackChanged { .. } | SessionEvent::PlaylistChanged(_) => {
                    let session = self.session.lock().await;
                    let (video, playing) = (session.is_playing_video(), session.is_playing());
                    drop(session);
                    self.last_error = None;
                    self.machine.track_changed(now, video, playing);
                }
                SessionEvent::PlayingStateChanged(playing) => {
                    self.machine.playing_changed(now, playing);
                }
                SessionEvent::TrackUnavailable { track, message } => {
                    let name = track.map(|t| t.name).unwrap_or_else(|| "Track".to_string());
                    self.last_error = Some(format!("{} is unavailable: {}", name, message));
                }
            }
        }

        if changed {
            tracing::trace!(auto_hide = self.machine.is_auto_hide_armed(), "Session events applied");
            self.refresh_snapshot().await;
        }
    }

    /// Drive timers; call once per frame
    pub async fn tick(&mut self, now: Instant) {
        if !self.is_active() {
            return;
        }
        self.machine.poll(now);
        if self.progress.due(now) {
            self.refresh_snapshot().await;
        }
    }

    pub async fn tap(&mut self, now: Instant, side: TapSide) -> TapOutcome {
        let outcome = self.machine.tap(now, side);
        if let TapOutcome::Seek(direction) = outcome {
            let step = self.config.seek_step_ms as i64;
            let delta = match direction {
                SeekDirection::Backward => -step,
                SeekDirection::Forward => step,
            };
            self.session.lock().await.seek_by(delta);
            tracing::debug!(delta, "Gesture seek");
            self.refresh_snapshot().await;
        }
        outcome
    }

    pub async fn toggle_play_pause(&mut self, now: Instant) {
        self.session.lock().await.toggle_play_pause();
        self.machine.on_interaction(now);
        self.refresh_snapshot().await;
    }

    pub async fn play_adjacent(&mut self, now: Instant, direction: Direction) {
        self.session.lock().await.play_adjacent(direction);
        self.machine.on_interaction(now);
    }

    pub fn seek_bar_started(&mut self) {
        self.machine.seek_bar_touch_started();
    }

    pub async fn seek_bar_moved(&mut self, position_ms: u64) {
        self.session.lock().await.seek_to(position_ms);
        self.refresh_snapshot().await;
    }

    pub fn seek_bar_finished(&mut self, now: Instant) {
        self.machine.seek_bar_touch_ended(now);
    }

    /// Leave the screen: stop listening, restore chrome, remember the position
    pub async fn exit(&mut self) {
        let Some(id) = self.subscription.take() else {
            return;
        };

        self.machine.exit();
        self.progress.stop();

        let mut session = self.session.lock().await;
        session.unsubscribe(id);
        session.save_resume_record();
    }

    async fn refresh_snapshot(&mut self) {
        let session = self.session.lock().await;
        self.snapshot = PlaybackSnapshot {
            track: session.current_track().cloned(),
            index: session.current_index(),
            track_count: session.playlist().len(),
            position_ms: session.current_position(),
            duration_ms: session.duration(),
            is_playing: session.is_playing(),
        };
    }
}

impl<H: ChromeHost> Drop for PlayerScreen<H> {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.machine.exit();
            if let Ok(mut session) = self.session.try_lock() {
                session.unsubscribe(id);
            }
        }
    }
}
