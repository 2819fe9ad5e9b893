//! Library module: the `Track` model and the directory scanner.
//!
//! Tracks are identified by their file name within the library directory.
//! The whole list is rebuilt on startup and on explicit rescan; nothing is
//! diffed against a previous scan.

mod model;
mod scan;

pub use model::{Track, TrackId};
pub use scan::scan;
