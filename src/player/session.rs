use std::time::Duration;

use tracing::warn;

use crate::library::Track;

use super::engine::{Engine, EngineError, EngineState};

/// Thin wrapper the navigator drives.
///
/// Adds the two things the state machine should not care about: resolving
/// a `Track` to an engine load, and swallowing engine-call failures so a
/// broken file or an odd seek never takes the application down.
pub struct Session<E: Engine> {
    engine: E,
}

impl<E: Engine> Session<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Load `track` and start playing it.
    pub fn start(&mut self, track: &Track) -> Result<(), EngineError> {
        self.engine.load(&track.path)?;
        self.engine.play();
        Ok(())
    }

    pub fn play(&mut self) {
        self.engine.play();
    }

    pub fn pause(&mut self) {
        self.engine.pause();
    }

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    /// Seek to an absolute position given in seconds. Fire-and-forget:
    /// invalid requests are clamped or dropped by the engine.
    pub fn seek_secs(&mut self, secs: u64) {
        self.engine.seek(Duration::from_secs(secs));
    }

    pub fn position(&self) -> Duration {
        self.engine.position()
    }

    /// `None` while the engine cannot tell (nothing loaded, or the format
    /// hides its length); callers skip time-dependent rendering then.
    pub fn length(&self) -> Option<Duration> {
        self.engine.length().filter(|d| !d.is_zero())
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    /// Log a failed engine call; the app keeps running regardless.
    pub fn report(&self, err: EngineError) {
        warn!(error = %err, "engine call failed");
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
