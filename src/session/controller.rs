//! The session actor: one state record, mutated only on the session thread.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::audio::{OutputEngine, Terminal};
use crate::clock::Position;
use crate::error::Result;
use crate::library::Track;
use crate::playlist::{Navigator, Playlist};

use super::driver::OutputDriver;
use super::observer::PlaybackObserver;
use super::ticker::Ticker;
use super::types::{Command, Inbound, PlaybackHandle, PlaybackInfo, PlaybackState};

/// Why the session halted the output itself.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum HaltReason {
    Pause,
    Seek,
    Navigation,
    Stop,
    Shutdown,
}

/// Marks the one output generation the session stopped on purpose. Its
/// terminal notification must not be taken for a natural end of track.
#[derive(Debug, Copy, Clone)]
struct Halt {
    generation: u64,
    reason: HaltReason,
}

struct AttachedPlaylist {
    list: Playlist,
    nav: Navigator,
}

pub(super) struct Controller {
    driver: OutputDriver,
    ticker: Option<Ticker>,
    tick_interval: Duration,
    scale: f64,
    inbox: Sender<Inbound>,

    state: PlaybackState,
    track: Option<Track>,
    playlist: Option<AttachedPlaylist>,
    position: Position,
    halt: Option<Halt>,

    observer: Arc<dyn PlaybackObserver>,
    info: PlaybackHandle,
}

impl Controller {
    pub(super) fn new(
        engine: Box<dyn OutputEngine>,
        observer: Arc<dyn PlaybackObserver>,
        info: PlaybackHandle,
        inbox: Sender<Inbound>,
        tick_interval: Duration,
        scale: f64,
    ) -> Self {
        Self {
            driver: OutputDriver::new(engine, inbox.clone(), scale),
            ticker: None,
            tick_interval,
            scale,
            inbox,
            state: PlaybackState::Idle,
            track: None,
            playlist: None,
            position: Position::ZERO,
            halt: None,
            observer,
            info,
        }
    }

    pub(super) fn run(mut self, rx: Receiver<Inbound>) {
        while let Ok(msg) = rx.recv() {
            match msg {
                Inbound::Command(cmd, reply) => {
                    let result = self.apply(cmd).map(|()| self.snapshot());
                    self.publish();
                    let _ = reply.send(result);
                }
                Inbound::Terminal {
                    generation,
                    terminal,
                } => {
                    self.on_terminal(generation, terminal);
                    self.publish();
                }
                Inbound::Tick { generation } => {
                    if self.on_tick(generation) {
                        self.publish_position();
                    }
                }
                Inbound::Shutdown => break,
            }
        }

        self.halt_output(HaltReason::Shutdown);
        self.set_state(PlaybackState::Idle);
        self.publish();
        debug!("playback session stopped");
    }

    fn apply(&mut self, cmd: Command) -> Result<()> {
        match cmd {
            Command::Load(track) => self.load(track),
            Command::LoadPlaylist(playlist) => self.load_playlist(playlist),
            Command::Pause => {
                self.pause();
                Ok(())
            }
            Command::Resume => self.resume(),
            Command::TogglePause => {
                if self.state == PlaybackState::Playing {
                    self.pause();
                    Ok(())
                } else {
                    self.resume()
                }
            }
            Command::Stop => {
                self.stop();
                Ok(())
            }
            Command::Seek(frame) => self.seek(frame),
            Command::SeekBy(delta_ms) => self.seek_by(delta_ms),
            Command::Next => self.navigate(|nav, len| nav.peek_next(len)),
            Command::Previous => self.navigate(|nav, _| nav.peek_previous()),
            Command::Snapshot => Ok(()),
        }
    }

    fn load(&mut self, track: Track) -> Result<()> {
        self.driver.probe(&track)?;
        self.begin(track, |s| s.playlist = None)
    }

    fn load_playlist(&mut self, list: Playlist) -> Result<()> {
        let Some(first) = list.get(0).cloned() else {
            debug!("ignoring empty playlist");
            return Ok(());
        };
        self.driver.probe(&first)?;
        self.begin(first, move |s| {
            s.playlist = Some(AttachedPlaylist {
                list,
                nav: Navigator::default(),
            })
        })
    }

    /// Replace the current track and play it from the top.
    ///
    /// Nothing about the session changes unless the new output starts;
    /// `commit` applies the playlist side of the change once it has.
    fn begin(&mut self, track: Track, commit: impl FnOnce(&mut Self)) -> Result<()> {
        let resume_at = self.running_position();
        self.halt_output(HaltReason::Navigation);
        debug!(path = %track.path().display(), "loading track");

        if let Err(e) = self.launch(&track, Position::ZERO) {
            error!(error = %e, "output failed to start");
            self.recover(resume_at);
            return Err(e);
        }

        commit(self);
        self.observer.track_changed(&track);
        self.track = Some(track);
        self.move_to(Position::ZERO);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Position of the running output, if there is one.
    fn running_position(&self) -> Option<Position> {
        (self.state == PlaybackState::Playing && self.driver.is_running())
            .then(|| self.driver.position())
    }

    /// Start the output and its ticker. Session state is left to the caller.
    fn launch(&mut self, track: &Track, at: Position) -> Result<()> {
        let generation = self.driver.start(track, at)?;
        self.ticker = Some(Ticker::spawn(
            self.tick_interval,
            generation,
            self.inbox.clone(),
        ));
        Ok(())
    }

    /// Play the current track from `at`. On failure nothing changes.
    fn play_from(&mut self, at: Position) -> Result<()> {
        let Some(track) = self.track.clone() else {
            return Ok(());
        };
        if let Err(e) = self.launch(&track, at) {
            error!(error = %e, "output failed to start");
            return Err(e);
        }
        self.move_to(at);
        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// After a failed start, bring back the output that was halted for it.
    fn recover(&mut self, resume_at: Option<Position>) {
        let Some(position) = resume_at else {
            return;
        };
        if self.play_from(position).is_err() {
            warn!("previous output could not be restored");
            self.move_to(position);
            self.set_state(PlaybackState::Idle);
        }
    }

    /// Stop the ticker and the output. A live output leaves a halt marker
    /// behind for its terminal notification.
    fn halt_output(&mut self, reason: HaltReason) {
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        if let Some(generation) = self.driver.stop() {
            self.halt = Some(Halt { generation, reason });
        }
    }

    fn pause(&mut self) {
        if self.state != PlaybackState::Playing {
            return;
        }
        let position = self.driver.position();
        self.halt_output(HaltReason::Pause);
        self.move_to(position);
        self.set_state(PlaybackState::Paused);
    }

    fn resume(&mut self) -> Result<()> {
        match self.state {
            PlaybackState::Paused => self.play_from(self.position),
            PlaybackState::Idle | PlaybackState::Finished if self.track.is_some() => {
                self.play_from(Position::ZERO)
            }
            _ => Ok(()),
        }
    }

    fn stop(&mut self) {
        self.halt_output(HaltReason::Stop);
        self.move_to(Position::ZERO);
        self.set_state(PlaybackState::Idle);
    }

    fn seek(&mut self, frame: u64) -> Result<()> {
        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };
        let clock = track.clock(self.scale);
        if !clock.has_rate() {
            debug!(frame, "track length unknown, ignoring frame seek");
            return Ok(());
        }
        let target = clock.position_at(frame.min(track.total_frames()));
        self.seek_to(target)
    }

    fn seek_by(&mut self, delta_ms: i64) -> Result<()> {
        let Some(track) = self.track.as_ref() else {
            return Ok(());
        };
        let current = self.running_position().unwrap_or(self.position);
        let target_ms = current.elapsed_ms.saturating_add_signed(delta_ms);

        let clock = track.clock(self.scale);
        let target = if clock.has_rate() {
            let frame = clock.to_frame(target_ms).min(track.total_frames());
            clock.position_at(frame)
        } else {
            // Unknown length: move in time only, no upper bound.
            Position {
                frame_offset: 0,
                elapsed_ms: target_ms,
            }
        };
        self.seek_to(target)
    }

    fn seek_to(&mut self, target: Position) -> Result<()> {
        match self.state {
            PlaybackState::Playing => {
                let resume_at = self.running_position();
                self.halt_output(HaltReason::Seek);
                if let Err(e) = self.play_from(target) {
                    self.recover(resume_at);
                    return Err(e);
                }
                Ok(())
            }
            PlaybackState::Paused => {
                // A seek queued ahead of the pause notification must not be
                // overwritten by its fold.
                if let Some(halt) = self.halt.as_mut() {
                    if halt.reason == HaltReason::Pause {
                        halt.reason = HaltReason::Seek;
                    }
                }
                self.move_to(target);
                Ok(())
            }
            PlaybackState::Idle | PlaybackState::Finished => Ok(()),
        }
    }

    fn navigate(&mut self, step: impl FnOnce(&Navigator, usize) -> Option<usize>) -> Result<()> {
        let Some(attached) = self.playlist.as_ref() else {
            return Ok(());
        };
        let Some(index) = step(&attached.nav, attached.list.len()) else {
            debug!(index = attached.nav.index(), "playlist boundary, ignoring navigation");
            return Ok(());
        };
        let Some(track) = attached.list.get(index).cloned() else {
            return Ok(());
        };

        self.driver.probe(&track)?;
        self.begin(track, move |s| {
            if let Some(attached) = s.playlist.as_mut() {
                attached.nav.jump(index);
            }
        })
    }

    fn on_terminal(&mut self, generation: u64, terminal: Terminal) {
        if let Some(halt) = self.halt.take_if(|h| h.generation == generation) {
            debug!(generation, reason = ?halt.reason, "output halted on request");
            if halt.reason == HaltReason::Pause && self.state == PlaybackState::Paused {
                let position = self.driver.position_after(terminal.elapsed());
                self.move_to(position);
            }
            return;
        }

        if !self.driver.is_live(generation) {
            debug!(generation, "ignoring stale output notification");
            return;
        }

        self.driver.mark_ended();
        if let Some(ticker) = self.ticker.take() {
            ticker.stop();
        }
        if let Terminal::Stopped { .. } = terminal {
            warn!(generation, "output stopped unprompted, treating as end of track");
        }

        let end = match self.track.as_ref() {
            Some(t) if t.total_frames() > 0 => t.clock(self.scale).position_at(t.total_frames()),
            _ => self.driver.position_after(terminal.elapsed()),
        };
        self.move_to(end);

        let has_next = self
            .playlist
            .as_ref()
            .is_some_and(|p| !p.nav.is_last(p.list.len()));
        if has_next {
            match self.navigate(|nav, len| nav.peek_next(len)) {
                Ok(()) => return,
                Err(e) => warn!(error = %e, "could not advance to the next playlist track"),
            }
        }

        self.set_state(PlaybackState::Finished);
    }

    /// Sample the live output; false when the tick is stale.
    fn on_tick(&mut self, generation: u64) -> bool {
        if self.state != PlaybackState::Playing || !self.driver.is_live(generation) {
            return false;
        }
        let position = self.driver.position();
        self.move_to(position);
        true
    }

    fn move_to(&mut self, position: Position) {
        self.position = position;
        self.observer.position_changed(position);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state == state {
            return;
        }
        debug!(from = ?self.state, to = ?state, "playback state changed");
        self.state = state;
        self.observer.state_changed(state);
    }

    fn snapshot(&self) -> PlaybackInfo {
        PlaybackInfo {
            state: self.state,
            track: self.track.clone(),
            position: self.position,
            playlist_index: self.playlist.as_ref().map(|p| p.nav.index()),
            playlist_len: self.playlist.as_ref().map_or(0, |p| p.list.len()),
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.info.lock() {
            *info = self.snapshot();
        }
    }

    fn publish_position(&self) {
        if let Ok(mut info) = self.info.lock() {
            info.position = self.position;
        }
    }
}
