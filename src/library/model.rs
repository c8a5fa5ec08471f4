use std::path::{Path, PathBuf};

use crate::clock::{PositionClock, format_ms};

/// Placeholder for tag fields the metadata reader could not provide.
pub const UNKNOWN_FIELD: &str = "N/A";

/// Flat metadata record returned by a [`super::MetadataReader`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub length_ms: u64,
    pub total_frames: u64,
}

impl Default for TrackMetadata {
    fn default() -> Self {
        Self {
            title: UNKNOWN_FIELD.to_string(),
            artist: UNKNOWN_FIELD.to_string(),
            genre: UNKNOWN_FIELD.to_string(),
            length_ms: 0,
            total_frames: 0,
        }
    }
}

/// An immutable, playable track.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    path: PathBuf,
    title: String,
    artist: String,
    genre: String,
    total_frames: u64,
    length_ms: u64,
    frames_per_ms: f64,
}

impl Track {
    pub fn new(path: impl Into<PathBuf>, metadata: TrackMetadata) -> Self {
        let frames_per_ms = if metadata.length_ms == 0 {
            0.0
        } else {
            metadata.total_frames as f64 / metadata.length_ms as f64
        };

        Self {
            path: path.into(),
            title: metadata.title,
            artist: metadata.artist,
            genre: metadata.genre,
            total_frames: metadata.total_frames,
            length_ms: metadata.length_ms,
            frames_per_ms,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn genre(&self) -> &str {
        &self.genre
    }

    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    pub fn length_ms(&self) -> u64 {
        self.length_ms
    }

    /// Frames per millisecond; 0.0 when the length is unknown.
    pub fn frames_per_ms(&self) -> f64 {
        self.frames_per_ms
    }

    pub fn clock(&self, scale: f64) -> PositionClock {
        PositionClock::new(self.frames_per_ms, scale)
    }

    /// `mm:ss` length string.
    pub fn length_display(&self) -> String {
        format_ms(self.length_ms)
    }

    /// "Artist - Title", or just the title when the artist is unknown.
    pub fn display(&self) -> String {
        let artist = self.artist.trim();
        if artist.is_empty() || artist == UNKNOWN_FIELD {
            self.title.clone()
        } else {
            format!("{} - {}", artist, self.title)
        }
    }
}
