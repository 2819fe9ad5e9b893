//! Application module: exposes the view-state model used by the TUI and
//! runtime.
//!
//! The `App` model lives in `app::model` and holds the active view, row
//! selection, filter and prompt state. Playback state lives in the
//! navigator, never here.

mod model;

pub use model::*;
