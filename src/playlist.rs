//! Ordered track lists, their on-disk format and index navigation.

mod file;
mod navigator;

use std::path::Path;

use tracing::warn;

use crate::error::Result;
use crate::library::{MetadataReader, Track};

pub use file::{read_playlist, write_playlist};
pub use navigator::{Navigator, next_index, previous_index};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Load a playlist file and open every listed track.
    ///
    /// An unreadable playlist file is an error. Entries that cannot be opened
    /// are skipped with a warning so one missing file does not sink the list.
    pub fn open(path: &Path, reader: &dyn MetadataReader) -> Result<Self> {
        let entries = read_playlist(path)?;
        Ok(Self::from_paths(&entries, reader))
    }

    /// Open each path in order, skipping the ones that fail.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P], reader: &dyn MetadataReader) -> Self {
        let mut tracks = Vec::new();
        for entry in paths {
            let entry = entry.as_ref();
            match Track::open(entry, reader) {
                Ok(t) => tracks.push(t),
                Err(e) => warn!(path = %entry.display(), error = %e, "skipping playlist entry"),
            }
        }
        Self { tracks }
    }

    /// Write the track paths back out in playlist format.
    pub fn save(&self, path: &Path) -> Result<()> {
        let paths: Vec<&Path> = self.tracks.iter().map(Track::path).collect();
        write_playlist(path, &paths)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}

#[cfg(test)]
mod tests;
