//! Player-screen visibility state machine
//!
//! Governs whether playback controls are shown and whether the host chrome is
//! immersive. Immersive chrome is only ever used for video; audio playback
//! keeps normal chrome even with controls hidden.
//!
//! All methods take the current time explicitly. The owning screen calls
//! [`VisibilityMachine::poll`] from its frame loop to fire due timers.

use std::time::{Duration, Instant};
use serde::Deserialize;

use super::timer::ScreenTimer;

pub const AUTO_HIDE_DELAY: Duration = Duration::from_millis(3000);
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Controls {
    Visible,
    Hidden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chrome {
    Normal,
    Immersive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
    pub controls: Controls,
    pub chrome: Chrome,
}

impl Visibility {
    pub const VISIBLE: Visibility = Visibility { controls: Controls::Visible, chrome: Chrome::Normal };
    pub const HIDDEN_IMMERSIVE: Visibility = Visibility { controls: Controls::Hidden, chrome: Chrome::Immersive };

    pub fn is_immersive(&self) -> bool {
        self.chrome == Chrome::Immersive
    }

    pub fn controls_visible(&self) -> bool {
        self.controls == Controls::Visible
    }
}

impl Default for Visibility {
    fn default() -> Self {
        Self::VISIBLE
    }
}

/// Navigation-host surface that shows or hides chrome and controls
pub trait ChromeHost: Send {
    fn apply(&mut self, visibility: Visibility);
}

/// Publishes visibility to whoever renders the chrome
impl ChromeHost for tokio::sync::watch::Sender<Visibility> {
    fn apply(&mut self, visibility: Visibility) {
        self.send_replace(visibility);
    }
}

/// How taps on the video surface are interpreted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TapMode {
    /// Every tap toggles the controls
    SimpleToggle,
    /// Single tap toggles, double tap seeks (or hides when controls are shown)
    #[default]
    GestureSeek,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapSide {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeekDirection {
    Backward,
    Forward,
}

/// What a tap resolved to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// Waiting to see whether a second tap follows
    Pending,
    Toggled,
    Hidden,
    Seek(SeekDirection),
    Ignored,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityConfig {
    pub tap_mode: TapMode,
    pub auto_hide: Duration,
    pub double_tap_window: Duration,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            tap_mode: TapMode::default(),
            auto_hide: AUTO_HIDE_DELAY,
            double_tap_window: DOUBLE_TAP_WINDOW,
        }
    }
}

pub struct VisibilityMachine<H: ChromeHost> {
    config: VisibilityConfig,
    host: H,
    visibility: Visibility,
    video: bool,
    playing: bool,
    auto_hide: ScreenTimer,
    pending_tap: ScreenTimer,
    seek_streak: ScreenTimer,
}

impl<H: ChromeHost> VisibilityMachine<H> {
    pub fn new(config: VisibilityConfig, host: H) -> Self {
        Self {
            config,
            host,
            visibility: Visibility::default(),
            video: false,
            playing: false,
            auto_hide: ScreenTimer::default(),
            pending_tap: ScreenTimer::default(),
            seek_streak: ScreenTimer::default(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn tap_mode(&self) -> TapMode {
        self.config.tap_mode
    }

    pub fn is_auto_hide_armed(&self) -> bool {
        self.auto_hide.is_armed()
    }

    /// Screen (re)entered or the current track changed. Video goes straight
    /// to hidden + immersive so the chrome never flashes.
    pub fn enter(&mut self, now: Instant, video: bool, playing: bool) {
        self.auto_hide.disarm();
        self.pending_tap.disarm();
        self.seek_streak.disarm();
        self.video = video;
        self.playing = playing;

        self.visibility = if video { Visibility::HIDDEN_IMMERSIVE } else { Visibility::VISIBLE };
        self.host.apply(self.visibility);
        tracing::debug!(video, playing, visibility = ?self.visibility, "Player screen entered");
        self.rearm_auto_hide(now);
    }

    /// Track change while the screen is active
    pub fn track_changed(&mut self, now: Instant, video: bool, playing: bool) {
        self.enter(now, video, playing);
    }

    pub fn toggle(&mut self, now: Instant) {
        match self.visibility.controls {
            Controls::Visible => self.hide(),
            Controls::Hidden => self.show(now),
        }
    }

    /// Button press or other activity on the controls
    pub fn on_interaction(&mut self, now: Instant) {
        self.rearm_auto_hide(now);
    }

    pub fn seek_bar_touch_started(&mut self) {
        self.auto_hide.disarm();
    }

    pub fn seek_bar_touch_ended(&mut self, now: Instant) {
        self.rearm_auto_hide(now);
    }

    pub fn playing_changed(&mut self, now: Instant, playing: bool) {
        self.playing = playing;
        if !self.video {
            return;
        }

        if playing {
            self.rearm_auto_hide(now);
        } else {
            self.auto_hide.disarm();
            self.show(now);
        }
    }

    pub fn tap(&mut self, now: Instant, side: TapSide) -> TapOutcome {
        self.poll(now);

        match self.config.tap_mode {
            TapMode::SimpleToggle => {
                self.toggle(now);
                TapOutcome::Toggled
            }
            TapMode::GestureSeek => {
                if self.video && self.seek_streak.is_running(now) {
                    self.seek_streak.arm(now, self.config.double_tap_window);
                    return TapOutcome::Seek(seek_direction(side));
                }

                if self.pending_tap.is_running(now) {
                    self.pending_tap.disarm();
                    return self.double_tap(now, side);
                }

                self.pending_tap.arm(now, self.config.double_tap_window);
                TapOutcome::Pending
            }
        }
    }

    fn double_tap(&mut self, now: Instant, side: TapSide) -> TapOutcome {
        if !self.video {
            return TapOutcome::Ignored;
        }

        match self.visibility.controls {
            Controls::Visible => {
                self.hide();
                TapOutcome::Hidden
            }
            Controls::Hidden => {
                self.seek_streak.arm(now, self.config.double_tap_window);
                TapOutcome::Seek(seek_direction(side))
            }
        }
    }

    /// Fire due timers. Returns true when the visibility changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let before = self.visibility;

        if self.pending_tap.fire_if_due(now) {
            tracing::trace!("Single tap confirmed");
            self.toggle(now);
        }

        if self.auto_hide.fire_if_due(now) && self.video && self.playing {
            tracing::trace!("Auto-hiding controls");
            self.hide();
        }

        self.seek_streak.fire_if_due(now);
        before != self.visibility
    }

    /// Screen left: disarm everything and hand normal chrome back to the host
    /// whatever state the screen was in
    pub fn exit(&mut self) {
        self.auto_hide.disarm();
        self.pending_tap.disarm();
        self.seek_streak.disarm();
        self.visibility.chrome = Chrome::Normal;
        self.host.apply(self.visibility);
        tracing::debug!("Player screen exited, chrome restored");
    }

    fn show(&mut self, now: Instant) {
        self.set(Visibility::VISIBLE);
        self.rearm_auto_hide(now);
    }

    fn hide(&mut self) {
        self.auto_hide.disarm();
        self.set(Visibility {
            controls: Controls::Hidden,
            chrome: if self.video { Chrome::Immersive } else { Chrome::Normal },
        });
    }

    fn set(&mut self, visibility: Visibility) {
        if self.visibility != visibility {
            self.visibility = visibility;
            self.host.apply(visibility);
        }
    }

    fn rearm_auto_hide(&mut self, now: Instant) {
        self.auto_hide.disarm();
        if self.video && self.playing && self.visibility.controls_visible() {
            self.auto_hide.arm(now, self.config.auto_hide);
        }
    }
}

fn seek_direction(side: TapSide) -> SeekDirection {
    match side {
        TapSide::Left => SeekDirection::Backward,
        TapSide::Right => SeekDirection::Forward,
    }
}
