use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::error;

use crate::audio::OutputEngine;
use crate::config::PlaybackSettings;
use crate::error::{PlayerError, Result};
use crate::library::Track;
use crate::playlist::Playlist;

use super::controller::Controller;
use super::observer::PlaybackObserver;
use super::types::{Command, Inbound, PlaybackHandle, PlaybackInfo};

/// Handle to the playback session thread.
///
/// Every transport call is a request to the session thread; it returns once
/// the transition has been carried out, with the resulting snapshot. Calls
/// never wait for audio to play out.
pub struct Session {
    tx: Sender<Inbound>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Start the session thread.
    ///
    /// `make_engine` runs on the session thread, so engines holding
    /// thread-bound audio streams can be used.
    pub fn spawn<F, E>(
        make_engine: F,
        observer: Arc<dyn PlaybackObserver>,
        settings: &PlaybackSettings,
    ) -> Result<Self>
    where
        F: FnOnce() -> Result<E> + Send + 'static,
        E: OutputEngine + 'static,
    {
        let (tx, rx) = mpsc::channel::<Inbound>();
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let inbox = tx.clone();
        let shared = playback.clone();
        let tick_interval = Duration::from_millis(settings.tick_interval_ms.max(1));
        let scale = settings.frame_scale;

        let handle = thread::spawn(move || {
            let engine = match make_engine() {
                Ok(engine) => engine,
                Err(e) => {
                    let _ = ready_tx.send(Err(e));
                    return;
                }
            };
            let _ = ready_tx.send(Ok(()));
            Controller::new(
                Box::new(engine),
                observer,
                shared,
                inbox,
                tick_interval,
                scale,
            )
            .run(rx);
        });

        if let Err(e) = ready_rx.recv().unwrap_or(Err(PlayerError::SessionClosed)) {
            let _ = handle.join();
            return Err(e);
        }

        Ok(Self {
            tx,
            playback,
            join: Mutex::new(Some(handle)),
        })
    }

    fn request(&self, cmd: Command) -> Result<PlaybackInfo> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Inbound::Command(cmd, reply_tx))
            .map_err(|_| PlayerError::SessionClosed)?;
        reply_rx.recv().map_err(|_| PlayerError::SessionClosed)?
    }

    /// Play `track` from the start, detaching any playlist.
    pub fn load(&self, track: Track) -> Result<PlaybackInfo> {
        self.request(Command::Load(track))
    }

    /// Attach `playlist` and play its first track. An empty playlist is ignored.
    pub fn load_playlist(&self, playlist: Playlist) -> Result<PlaybackInfo> {
        self.request(Command::LoadPlaylist(playlist))
    }

    pub fn pause(&self) -> Result<PlaybackInfo> {
        self.request(Command::Pause)
    }

    /// Continue from the paused position, or restart a stopped/finished track.
    pub fn resume(&self) -> Result<PlaybackInfo> {
        self.request(Command::Resume)
    }

    pub fn play(&self) -> Result<PlaybackInfo> {
        self.resume()
    }

    pub fn toggle_pause(&self) -> Result<PlaybackInfo> {
        self.request(Command::TogglePause)
    }

    pub fn stop(&self) -> Result<PlaybackInfo> {
        self.request(Command::Stop)
    }

    /// Move to an absolute frame offset. Only acts while playing or paused.
    pub fn seek(&self, frame_offset: u64) -> Result<PlaybackInfo> {
        self.request(Command::Seek(frame_offset))
    }

    /// Move by a signed number of milliseconds, clamped at the start.
    pub fn seek_by(&self, delta_ms: i64) -> Result<PlaybackInfo> {
        self.request(Command::SeekBy(delta_ms))
    }

    pub fn next(&self) -> Result<PlaybackInfo> {
        self.request(Command::Next)
    }

    pub fn previous(&self) -> Result<PlaybackInfo> {
        self.request(Command::Previous)
    }

    pub fn snapshot(&self) -> Result<PlaybackInfo> {
        self.request(Command::Snapshot)
    }

    /// Shared snapshot, refreshed after every session step.
    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    /// Halt output and wait for the session thread to exit.
    pub fn shutdown(&self) {
        let _ = self.tx.send(Inbound::Shutdown);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                if h.join().is_err() {
                    error!("playback session thread panicked");
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
