//! Single-track MP3 playback controller.
//!
//! A [`Session`] owns the playback state of one track at a time, optionally
//! walking an attached [`Playlist`]. Audio output goes through an
//! [`OutputEngine`]; position, track and state changes are pushed to a
//! [`PlaybackObserver`].

pub mod audio;
pub mod clock;
pub mod config;
pub mod error;
pub mod library;
pub mod playlist;
pub mod session;

pub use audio::{OutputEngine, RodioEngine, Terminal, TerminalNotifier};
pub use clock::{Position, PositionClock};
pub use crate::config::Settings;
pub use error::{PlayerError, Result};
pub use library::{LoftyReader, MetadataReader, Track, TrackMetadata};
pub use playlist::{Navigator, Playlist};
pub use session::{
    NullObserver, PlaybackHandle, PlaybackInfo, PlaybackObserver, PlaybackState, PlayerEvent,
    Session,
};
