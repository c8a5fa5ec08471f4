//! Session state, snapshots and the actor's inbox messages.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::audio::Terminal;
use crate::clock::Position;
use crate::error::Result;
use crate::library::Track;
use crate::playlist::Playlist;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No output running, nothing playing.
    #[default]
    Idle,
    /// Output is running.
    Playing,
    /// Output halted, position retained.
    Paused,
    /// The current track played to its end.
    Finished,
}

/// Playback information shared with the front-end.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    pub track: Option<Track>,
    pub position: Position,
    /// Index into the attached playlist, if any.
    pub playlist_index: Option<usize>,
    pub playlist_len: usize,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

#[derive(Debug)]
pub(crate) enum Command {
    Load(Track),
    LoadPlaylist(Playlist),
    Pause,
    Resume,
    TogglePause,
    Stop,
    /// Absolute frame offset.
    Seek(u64),
    /// Relative offset in milliseconds.
    SeekBy(i64),
    Next,
    Previous,
    Snapshot,
}

pub(crate) type Reply = Sender<Result<PlaybackInfo>>;

/// Everything the session actor reacts to, in arrival order.
#[derive(Debug)]
pub(crate) enum Inbound {
    Command(Command, Reply),
    Terminal { generation: u64, terminal: Terminal },
    Tick { generation: u64 },
    Shutdown,
}
