//! Output engine seam and its terminal notification.
//!
//! An engine plays one file at a time. Every successful `start` is answered
//! by exactly one [`Terminal`], delivered through the [`TerminalNotifier`]
//! handed to it; the notifier is consumed on delivery.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// How an output run ended. `elapsed` counts audio played since its start.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Terminal {
    /// The stream reached its end.
    Finished { elapsed: Duration },
    /// `stop` was requested.
    Stopped { elapsed: Duration },
}

impl Terminal {
    pub fn elapsed(&self) -> Duration {
        match *self {
            Terminal::Finished { elapsed } | Terminal::Stopped { elapsed } => elapsed,
        }
    }
}

/// One-shot delivery of a [`Terminal`].
pub struct TerminalNotifier {
    deliver: Box<dyn FnOnce(Terminal) + Send>,
}

impl TerminalNotifier {
    pub fn new(deliver: impl FnOnce(Terminal) + Send + 'static) -> Self {
        Self {
            deliver: Box::new(deliver),
        }
    }

    pub fn finished(self, elapsed: Duration) {
        (self.deliver)(Terminal::Finished { elapsed });
    }

    pub fn stopped(self, elapsed: Duration) {
        (self.deliver)(Terminal::Stopped { elapsed });
    }
}

impl fmt::Debug for TerminalNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TerminalNotifier")
    }
}

/// A blocking decode/output backend driven by the playback session.
pub trait OutputEngine {
    /// Check that `path` can be opened and decoded without touching the
    /// current output.
    fn probe(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Begin output of `path` from `start_at` and return immediately.
    ///
    /// On error nothing is playing and `done` is dropped unused.
    fn start(&mut self, path: &Path, start_at: Duration, done: TerminalNotifier) -> Result<()>;

    /// Halt output. Returns once the terminal notification has been delivered;
    /// calling it with nothing playing is a no-op.
    fn stop(&mut self);

    /// Audio played since the last `start`.
    fn elapsed(&self) -> Duration;
}
