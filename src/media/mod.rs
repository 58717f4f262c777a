//! Media module - filesystem-backed media model
//!
//! - `formats`: supported extensions and the audio/video split
//! - `track`: `Track` and `MediaFolder` built from filesystem entries
//! - `scanner`: directory listing collaborator used by the browser and resume

mod formats;
mod track;
mod scanner;

pub use formats::{extension_of, MediaKind};
pub use track::{MediaFolder, Track};
pub use scanner::{FsScanner, MediaScanner};
