//! Clock-driven playback device
//!
//! Stands in for a real decode/render engine in the terminal front-end: it
//! checks the file, estimates a duration from its size and a nominal bitrate,
//! and advances a playback clock. End of media is signalled by a tokio task
//! that is aborted whenever the clock is stopped or moved.

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

use crate::media::{extension_of, MediaKind};
use super::device::{DeviceEvent, MediaLocator, PlaybackDevice};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockDeviceConfig {
    pub audio_kbps: u64,
    pub video_kbps: u64,
}

impl Default for ClockDeviceConfig {
    fn default() -> Self {
        Self {
            audio_kbps: 192,
            video_kbps: 2500,
        }
    }
}

pub struct ClockDevice {
    config: ClockDeviceConfig,
    events: UnboundedSender<DeviceEvent>,
    locator: Option<MediaLocator>,
    duration_ms: u64,
    prepared: bool,
    /// Play intent; survives `load` so that auto-advance keeps playing
    playing: bool,
    base_position_ms: u64,
    started_at: Option<Instant>,
    end_timer: Option<JoinHandle<()>>,
}

impl ClockDevice {
    pub fn new(config: ClockDeviceConfig, events: UnboundedSender<DeviceEvent>) -> Self {
        Self {
            config,
            events,
            locator: None,
            duration_ms: 0,
            prepared: false,
            playing: false,
            base_position_ms: 0,
            started_at: None,
            end_timer: None,
        }
    }

    fn emit(&self, event: DeviceEvent) {
        if self.events.send(event).is_err() {
            tracing::trace!("Device event dropped, control loop gone");
        }
    }

    fn estimate_duration_ms(&self, size: u64, kind: MediaKind) -> u64 {
        let kbps = match kind {
            MediaKind::Audio => self.config.audio_kbps,
            MediaKind::Video => self.config.video_kbps,
        }
        .max(1);
        // bytes * 8 / (kbit/s * 1000) seconds, expressed in ms
        size.saturating_mul(8) / kbps
    }

    fn stop_clock(&mut self) {
        self.base_position_ms = self.position();
        self.started_at = None;
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }

    fn start_clock(&mut self) {
        let Some(locator) = self.locator.clone() else {
            return;
        };
        let now = Instant::now();
        self.started_at = Some(now);

        let remaining = Duration::from_millis(self.duration_ms.saturating_sub(self.base_position_ms));
        let deadline = now + remaining;
        let events = self.events.clone();
        self.end_timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = events.send(DeviceEvent::EndOfMedia { locator });
        }));
    }

    fn set_playing(&mut self, playing: bool) {
        if self.playing != playing {
            self.playing = playing;
            self.emit(DeviceEvent::PlayingStateChanged(playing));
        }
    }
}

impl PlaybackDevice for ClockDevice {
    fn load(&mut self, locator: &MediaLocator) {
        self.stop_clock();
        self.base_position_ms = 0;
        self.prepared = false;
        self.duration_ms = 0;
        self.locator = Some(locator.clone());

        let path = locator.path();
        let kind = MediaKind::from_extension(&extension_of(path));
        let size = std::fs::metadata(path).ok().filter(|m| m.is_file()).map(|m| m.len());
        // An empty or truncated file has nothing to play
        let duration_ms = size
            .zip(kind)
            .map(|(size, kind)| self.estimate_duration_ms(size, kind))
            .filter(|&duration_ms| duration_ms > 0);

        match duration_ms {
            Some(duration_ms) => {
                self.duration_ms = duration_ms;
                tracing::debug!(%locator, duration_ms, "Media loaded");
            }
            None => {
                self.locator = None;
                self.set_playing(false);
                self.emit(DeviceEvent::Error {
                    locator: locator.clone(),
                    message: "Media file is missing or unreadable".to_string(),
                });
            }
        }
    }

    fn prepare(&mut self) {
        if self.locator.is_none() || self.prepared {
            return;
        }
        self.prepared = true;
        if self.playing {
            self.start_clock();
        }
    }

    fn play(&mut self) {
        if self.playing || self.locator.is_none() {
            return;
        }
        self.set_playing(true);
        if self.prepared {
            self.start_clock();
        }
    }

    fn pause(&mut self) {
        if !self.playing {
            return;
        }
        self.stop_clock();
        self.set_playing(false);
    }

    fn seek(&mut self, position_ms: u64) {
        if self.locator.is_none() {
            return;
        }
        let running = self.started_at.is_some();
        self.stop_clock();
        self.base_position_ms = position_ms.min(self.duration_ms);
        if running {
            self.start_clock();
        }
    }

    fn position(&self) -> u64 {
        match self.started_at {
            Some(started_at) => {
                let elapsed = started_at.elapsed().as_millis() as u64;
                self.base_position_ms.saturating_add(elapsed).min(self.duration_ms)
            }
            None => self.base_position_ms,
        }
    }

    fn duration(&self) -> u64 {
        self.duration_ms
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn release(&mut self) {
        self.stop_clock();
        self.locator = None;
        self.playing = false;
        self.prepared = false;
    }
}

impl Drop for ClockDevice {
    fn drop(&mut self) {
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }
}
