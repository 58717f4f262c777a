//! Test doubles shared by the unit tests

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::Result;
use crate::media::{MediaKind, Track};
use crate::screen::{ChromeHost, Visibility};
use crate::session::{
    MediaLocator, PlaybackDevice, ResumeRecord, ResumeStore, SessionEvent, SessionListener,
};

fn track(path: &str, kind: MediaKind) -> Track {
    let path = PathBuf::from(path);
    Track {
        name: path.file_name().unwrap().to_string_lossy().into_owned(),
        title: path.file_stem().unwrap().to_string_lossy().into_owned(),
        extension: path.extension().unwrap().to_string_lossy().into_owned(),
        kind,
        size: 1024,
        path,
    }
}

pub fn audio(path: &str) -> Track {
    track(path, MediaKind::Audio)
}

pub fn video(path: &str) -> Track {
    track(path, MediaKind::Video)
}

#[derive(Clone, Debug, PartialEq)]
pub enum DeviceCall {
    Load(MediaLocator),
    Prepare,
    Play,
    Pause,
    Seek(u64),
    Release,
}

#[derive(Debug, Default)]
pub struct DeviceState {
    pub calls: Vec<DeviceCall>,
    pub playing: bool,
    pub position_ms: u64,
    pub duration_ms: u64,
}

/// Device that records every command; inspect it through the shared state
#[derive(Clone, Default)]
pub struct RecordingDevice {
    pub state: Arc<Mutex<DeviceState>>,
}

impl RecordingDevice {
    pub fn new(duration_ms: u64) -> Self {
        let device = Self::default();
        device.state.lock().unwrap().duration_ms = duration_ms;
        device
    }

    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn loads(&self) -> Vec<MediaLocator> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::Load(locator) => Some(locator),
                _ => None,
            })
            .collect()
    }

    pub fn set_position(&self, position_ms: u64) {
        self.state.lock().unwrap().position_ms = position_ms;
    }
}

impl PlaybackDevice for RecordingDevice {
    fn load(&mut self, locator: &MediaLocator) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DeviceCall::Load(locator.clone()));
        state.position_ms = 0;
    }

    fn prepare(&mut self) {
        self.state.lock().unwrap().calls.push(DeviceCall::Prepare);
    }

    fn play(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DeviceCall::Play);
        state.playing = true;
    }

    fn pause(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DeviceCall::Pause);
        state.playing = false;
    }

    fn seek(&mut self, position_ms: u64) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DeviceCall::Seek(position_ms));
        state.position_ms = position_ms;
    }

    fn position(&self) -> u64 {
        self.state.lock().unwrap().position_ms
    }

    fn duration(&self) -> u64 {
        self.state.lock().unwrap().duration_ms
    }

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().playing
    }

    fn release(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(DeviceCall::Release);
        state.playing = false;
    }
}

/// In-memory resume store; clones share the same slot
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub record: Arc<Mutex<Option<ResumeRecord>>>,
    pub puts: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub fn with_record(record: ResumeRecord) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(record);
        store
    }

    pub fn current(&self) -> Option<ResumeRecord> {
        self.record.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        *self.puts.lock().unwrap()
    }
}

impl ResumeStore for MemoryStore {
    fn put(&mut self, record: &ResumeRecord) -> Result<()> {
        *self.record.lock().unwrap() = Some(record.clone());
        *self.puts.lock().unwrap() += 1;
        Ok(())
    }

    fn get(&self) -> Result<Option<ResumeRecord>> {
        Ok(self.record.lock().unwrap().clone())
    }

    fn clear(&mut self) -> Result<()> {
        *self.record.lock().unwrap() = None;
        Ok(())
    }
}

/// Listener collecting every event it receives
#[derive(Clone, Default)]
pub struct EventLog {
    pub events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl EventLog {
    pub fn listener(&self) -> Arc<dyn SessionListener> {
        let events = self.events.clone();
        Arc::new(move |event: &SessionEvent| events.lock().unwrap().push(event.clone()))
    }

    pub fn take(&self) -> Vec<SessionEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn track_changes(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches!(e, SessionEvent::TrackChanged { .. }))
            .count()
    }
}

/// Chrome host recording every visibility it was asked to show
#[derive(Clone, Default)]
pub struct RecordingChrome {
    pub applied: Arc<Mutex<Vec<Visibility>>>,
}

impl RecordingChrome {
    pub fn applied(&self) -> Vec<Visibility> {
        self.applied.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Visibility> {
        self.applied.lock().unwrap().last().copied()
    }
}

impl ChromeHost for RecordingChrome {
    fn apply(&mut self, visibility: Visibility) {
        self.applied.lock().unwrap().push(visibility);
    }
}
