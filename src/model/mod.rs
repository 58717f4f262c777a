//! Model module - front-end state
//!
//! - `types`: tabs and UI state
//! - `browser`: folder browser listing and selection
//! - `app_model`: the model the controller mutates and the view reads

mod types;
mod browser;
mod app_model;

pub use types::{NowPlaying, Tab, UiState};
pub use browser::{BrowserEntry, BrowserState, FolderListing};
pub use app_model::AppModel;
