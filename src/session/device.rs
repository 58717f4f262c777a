//! Playback device boundary
//!
//! The device is the opaque decode/render engine. Commands never fail
//! synchronously: problems are reported as `DeviceEvent::Error` on the event
//! channel the device was built with.

use std::path::{Path, PathBuf};

/// Media locator handed to the device
///
/// Holds the path itself so that file names which are not valid UTF-8 reach
/// the device intact. The `file://` form is only used for display.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaLocator(PathBuf);

impl MediaLocator {
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl std::fmt::Display for MediaLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "file://{}", self.0.display())
    }
}

/// Events emitted by a device, delivered to the control loop over a channel
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    /// The media identified by `locator` played to its end
    EndOfMedia { locator: MediaLocator },
    PlayingStateChanged(bool),
    Error { locator: MediaLocator, message: String },
}

pub trait PlaybackDevice: Send {
    fn load(&mut self, locator: &MediaLocator);
    fn prepare(&mut self);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, position_ms: u64);
    fn position(&self) -> u64;
    /// Zero while unknown
    fn duration(&self) -> u64;
    fn is_playing(&self) -> bool;
    /// Stop and free engine resources; the device is not used afterwards
    fn release(&mut self);
}
