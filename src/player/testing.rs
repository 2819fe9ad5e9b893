//! A scripted `Engine` for navigator and session tests.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::engine::{Engine, EngineError, EngineState};

#[derive(Default)]
pub(crate) struct FakeEngine {
    /// Every path passed to `load`, in order.
    pub loaded: Vec<PathBuf>,
    pub playing: bool,
    pub seeks: Vec<Duration>,
    pub position: Duration,
    pub length: Option<Duration>,
    /// When set, the next `state()` call reports `Ended` once.
    pub ended: bool,
    /// When set, `load` fails (simulates an unreadable file).
    pub fail_load: bool,
}

impl Engine for FakeEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        if self.fail_load {
            return Err(EngineError::Decode {
                path: path.to_path_buf(),
                message: "scripted failure".into(),
            });
        }
        self.loaded.push(path.to_path_buf());
        self.playing = false;
        self.ended = false;
        self.position = Duration::ZERO;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: Duration) {
        self.seeks.push(position);
        self.position = position;
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn length(&self) -> Option<Duration> {
        self.length
    }

    fn state(&self) -> EngineState {
        if self.loaded.is_empty() {
            EngineState::Idle
        } else if self.ended {
            EngineState::Ended
        } else if self.playing {
            EngineState::Playing
        } else {
            EngineState::Paused
        }
    }
}
