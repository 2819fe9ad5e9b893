//! The playback engine boundary.
//!
//! Decoding and audio output are a black box behind the [`Engine`] trait;
//! the rest of the application only ever sees
//! load/play/pause/seek/position/length/state. End-of-track is detected by
//! polling [`Engine::state`] — the engine pushes no events.

mod backend;
mod engine;
mod session;

pub use backend::RodioEngine;
pub use engine::{Engine, EngineError, EngineState};
pub use session::Session;

#[cfg(test)]
pub(crate) mod testing;
