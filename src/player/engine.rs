use std::path::{Path, PathBuf};
use std::time::Duration;

/// What the engine reports when polled.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineState {
    /// Nothing loaded (or playback was stopped).
    Idle,
    Playing,
    Paused,
    /// The loaded track has played to its end.
    Ended,
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no audio output device available: {0}")]
    Output(String),

    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
}

/// The black-box media engine contract.
///
/// `length` is `None` while unknown; callers must skip time-dependent
/// rendering instead of dividing by it.
pub trait Engine {
    /// Load the file at `path`, replacing whatever was loaded before.
    /// Loading leaves the engine paused at position zero.
    fn load(&mut self, path: &Path) -> Result<(), EngineError>;

    fn play(&mut self);

    fn pause(&mut self);

    fn is_playing(&self) -> bool {
        self.state() == EngineState::Playing
    }

    /// Jump to an absolute position. Out-of-range requests are clamped or
    /// dropped by the implementation, never surfaced.
    fn seek(&mut self, position: Duration);

    fn position(&self) -> Duration;

    fn length(&self) -> Option<Duration>;

    fn state(&self) -> EngineState;
}
