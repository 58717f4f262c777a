//! Session module - playback coordination
//!
//! - `playlist`: ordered tracks with a wraparound cursor
//! - `device`: playback device boundary and its events
//! - `clock_device`: clock-driven device used by the terminal front-end
//! - `events`: session events and the listener registry
//! - `store`: resume record persistence
//! - `coordinator`: the process-wide session tying these together

mod playlist;
mod device;
mod clock_device;
mod events;
mod store;
mod coordinator;

pub use playlist::Direction;
pub use device::{DeviceEvent, MediaLocator, PlaybackDevice};
pub use clock_device::{ClockDevice, ClockDeviceConfig};
pub use events::{ChannelListener, SessionEvent, SessionListener, SubscriptionId};
pub use store::{JsonFileStore, ResumeRecord, ResumeStore};
pub use coordinator::{resume_in_background, ResumeOutcome, Session, SessionHandle};
