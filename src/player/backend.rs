use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lofty::prelude::*;
use lofty::probe::Probe;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink, Source};
use tracing::debug;

use super::engine::{Engine, EngineError, EngineState};

/// The rodio-backed engine.
///
/// rodio's mixer thread does the actual output; everything here is cheap
/// bookkeeping on the caller's thread. Elapsed time is tracked with a
/// started-at instant plus the time accumulated across pauses, since a
/// `Sink` does not report its position. Seeking rebuilds the sink with
/// `skip_duration` — the one seeking primitive that works across the
/// common formats.
pub struct RodioEngine {
    stream: OutputStream,
    sink: Option<Sink>,
    current: Option<PathBuf>,
    length: Option<Duration>,
    started_at: Option<Instant>,
    accumulated: Duration,
    paused: bool,
}

impl RodioEngine {
    pub fn new() -> Result<Self, EngineError> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| EngineError::Output(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            sink: None,
            current: None,
            length: None,
            started_at: None,
            accumulated: Duration::ZERO,
            paused: true,
        })
    }

    /// Build a paused sink for `path` that starts at `start_at`.
    fn build_sink(&self, path: &Path, start_at: Duration) -> Result<Sink, EngineError> {
        let file = File::open(path).map_err(|e| EngineError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        let source = Decoder::new(BufReader::new(file))
            .map_err(|e| EngineError::Decode {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
            .skip_duration(start_at);

        let sink = Sink::connect_new(self.stream.mixer());
        sink.append(source);
        sink.pause();
        Ok(sink)
    }

    fn probe_length(path: &Path) -> Option<Duration> {
        let tagged = Probe::open(path).ok()?.read().ok()?;
        Some(tagged.properties().duration())
    }
}

impl Engine for RodioEngine {
    fn load(&mut self, path: &Path) -> Result<(), EngineError> {
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let sink = self.build_sink(path, Duration::ZERO)?;
        self.length = Self::probe_length(path);
        self.sink = Some(sink);
        self.current = Some(path.to_path_buf());
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.paused = true;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = &self.sink {
            s.play();
            if self.paused {
                self.started_at = Some(Instant::now());
                self.paused = false;
            }
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
            if !self.paused {
                if let Some(st) = self.started_at.take() {
                    self.accumulated += st.elapsed();
                }
                self.paused = true;
            }
        }
    }

    fn seek(&mut self, position: Duration) {
        let Some(path) = self.current.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let target = match self.length {
            Some(len) if position > len => len,
            _ => position,
        };

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        match self.build_sink(&path, target) {
            Ok(new_sink) => {
                if self.paused {
                    self.started_at = None;
                } else {
                    new_sink.play();
                    self.started_at = Some(Instant::now());
                }
                self.sink = Some(new_sink);
                self.accumulated = target;
            }
            Err(e) => {
                // A failed seek must not kill playback handling; the caller
                // treats seeks as fire-and-forget.
                debug!(error = %e, "seek failed");
                self.started_at = None;
                self.paused = true;
            }
        }
    }

    fn position(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn length(&self) -> Option<Duration> {
        self.length
    }

    fn state(&self) -> EngineState {
        match &self.sink {
            None => EngineState::Idle,
            Some(s) if s.empty() && !self.paused => EngineState::Ended,
            Some(_) if self.paused => EngineState::Paused,
            Some(_) => EngineState::Playing,
        }
    }
}
