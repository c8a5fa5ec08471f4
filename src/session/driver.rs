use std::sync::mpsc::Sender;
use std::time::Duration;

use crate::audio::{OutputEngine, TerminalNotifier};
use crate::clock::{Position, PositionClock};
use crate::error::Result;
use crate::library::Track;

use super::types::Inbound;

/// Session-side wrapper around the output engine.
///
/// Every successful start gets a fresh generation; the engine's terminal
/// notification is tagged with it and routed into the session inbox.
pub(super) struct OutputDriver {
    engine: Box<dyn OutputEngine>,
    inbox: Sender<Inbound>,
    scale: f64,
    generation: u64,
    live: bool,
    start: Position,
    clock: PositionClock,
}

impl OutputDriver {
    pub(super) fn new(engine: Box<dyn OutputEngine>, inbox: Sender<Inbound>, scale: f64) -> Self {
        Self {
            engine,
            inbox,
            scale,
            generation: 0,
            live: false,
            start: Position::ZERO,
            clock: PositionClock::new(0.0, scale),
        }
    }

    pub(super) fn probe(&self, track: &Track) -> Result<()> {
        self.engine.probe(track.path())
    }

    /// Start `track` at `at`; returns the generation of the new output.
    ///
    /// The engine is started from `at.elapsed_ms`, which is meaningful even
    /// for tracks whose frame rate is unknown.
    pub(super) fn start(&mut self, track: &Track, at: Position) -> Result<u64> {
        self.stop();

        let clock = track.clock(self.scale);
        let generation = self.generation + 1;
        let inbox = self.inbox.clone();
        let done = TerminalNotifier::new(move |terminal| {
            let _ = inbox.send(Inbound::Terminal {
                generation,
                terminal,
            });
        });

        self.engine
            .start(track.path(), Duration::from_millis(at.elapsed_ms), done)?;

        self.generation = generation;
        self.live = true;
        self.start = at;
        self.clock = clock;
        Ok(generation)
    }

    /// Halt the live output. Returns its generation, or `None` if nothing was live.
    pub(super) fn stop(&mut self) -> Option<u64> {
        if !self.live {
            return None;
        }
        self.engine.stop();
        self.live = false;
        Some(self.generation)
    }

    /// The live output ended on its own.
    pub(super) fn mark_ended(&mut self) {
        self.live = false;
    }

    /// Whether an output is running right now.
    pub(super) fn is_running(&self) -> bool {
        self.live
    }

    pub(super) fn is_live(&self, generation: u64) -> bool {
        self.live && self.generation == generation
    }

    /// Current position from engine-reported progress.
    pub(super) fn position(&self) -> Position {
        self.position_after(self.engine.elapsed())
    }

    /// Position after `elapsed` of output from the most recent start.
    pub(super) fn position_after(&self, elapsed: Duration) -> Position {
        self.clock.advanced(self.start, elapsed)
    }
}
