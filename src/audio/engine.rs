use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error};

use crate::config::AudioSettings;
use crate::error::{PlayerError, Result};

use super::sink::{create_sink_at, open_decoder};
use super::types::{OutputEngine, TerminalNotifier};

/// One running output: the sink plus the watcher thread that reports its end.
struct ActiveOutput {
    sink: Arc<Sink>,
    stop_tx: Option<Sender<()>>,
    watcher: Option<JoinHandle<()>>,
}

impl ActiveOutput {
    fn halt(mut self) {
        // Dropping the sender wakes the watcher with `Disconnected`.
        self.stop_tx.take();
        if let Some(h) = self.watcher.take() {
            if h.join().is_err() {
                error!("output watcher thread panicked");
            }
        }
    }
}

/// `rodio`-backed engine: one default output stream, one sink per start.
pub struct RodioEngine {
    stream: OutputStream,
    volume: f32,
    poll_interval: Duration,
    active: Option<ActiveOutput>,
}

impl RodioEngine {
    pub fn new(settings: &AudioSettings) -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()
            .map_err(|e| PlayerError::AudioDevice(e.to_string()))?;
        // rodio logs to stderr when OutputStream is dropped; the terminal
        // front-end owns stderr.
        stream.log_on_drop(false);

        Ok(Self {
            stream,
            volume: settings.volume.clamp(0.0, 1.0),
            poll_interval: Duration::from_millis(settings.poll_interval_ms.max(1)),
            active: None,
        })
    }
}

fn spawn_watcher(
    sink: Arc<Sink>,
    poll_interval: Duration,
    done: TerminalNotifier,
) -> (Sender<()>, JoinHandle<()>) {
    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || {
        loop {
            match stop_rx.recv_timeout(poll_interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if sink.empty() {
                        debug!("output reached end of stream");
                        done.finished(sink.get_pos());
                        return;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    let elapsed = sink.get_pos();
                    sink.stop();
                    done.stopped(elapsed);
                    return;
                }
            }
        }
    });
    (stop_tx, handle)
}

impl OutputEngine for RodioEngine {
    fn probe(&self, path: &Path) -> Result<()> {
        open_decoder(path).map(|_| ())
    }

    fn start(&mut self, path: &Path, start_at: Duration, done: TerminalNotifier) -> Result<()> {
        self.stop();

        let sink = create_sink_at(&self.stream, path, start_at).map_err(|e| match e {
            PlayerError::TrackLoad { reason, .. } => PlayerError::output_start(path, reason),
            other => other,
        })?;
        sink.set_volume(self.volume);
        sink.play();

        let sink = Arc::new(sink);
        let (stop_tx, watcher) = spawn_watcher(sink.clone(), self.poll_interval, done);
        self.active = Some(ActiveOutput {
            sink,
            stop_tx: Some(stop_tx),
            watcher: Some(watcher),
        });
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.halt();
        }
    }

    fn elapsed(&self) -> Duration {
        self.active
            .as_ref()
            .map_or(Duration::ZERO, |a| a.sink.get_pos())
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        self.stop();
    }
}
