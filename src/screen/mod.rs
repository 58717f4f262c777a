pub mod player;
mod timer;
pub mod visibility;

pub use player::{PlaybackSnapshot, PlayerScreen, PlayerScreenConfig};
pub use visibility::{Chrome, ChromeHost, Controls, TapMode, TapSide, Visibility, VisibilityConfig};
