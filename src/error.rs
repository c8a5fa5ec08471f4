//! Error type shared by the playback session, the output engine and the
//! playlist helpers.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    /// The track file is missing, unreadable or not decodable.
    #[error("failed to load track {}: {reason}", path.display())]
    TrackLoad { path: PathBuf, reason: String },

    /// The output engine refused to start the track.
    #[error("failed to start output for {}: {reason}", path.display())]
    OutputStart { path: PathBuf, reason: String },

    #[error("failed to read playlist {}: {source}", path.display())]
    PlaylistRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write playlist {}: {source}", path.display())]
    PlaylistWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No usable audio output device.
    #[error("audio output unavailable: {0}")]
    AudioDevice(String),

    /// The session thread has shut down.
    #[error("playback session is closed")]
    SessionClosed,
}

impl PlayerError {
    pub(crate) fn track_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::TrackLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn output_start(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::OutputStart {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether the error means the track itself could not be played.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::TrackLoad { .. } | Self::OutputStart { .. })
    }
}

pub type Result<T> = std::result::Result<T, PlayerError>;
