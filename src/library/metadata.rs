//! Tag and stream-property reading.

use std::path::Path;

use lofty::prelude::*;
use tracing::{debug, warn};

use crate::error::{PlayerError, Result};

use super::model::{Track, TrackMetadata, UNKNOWN_FIELD};

/// Source of track metadata. Returns `None` when the file cannot be parsed.
pub trait MetadataReader {
    fn read(&self, path: &Path) -> Option<TrackMetadata>;
}

/// Reads tags and duration with `lofty`.
#[derive(Debug, Default, Copy, Clone)]
pub struct LoftyReader;

/// Sample rate assumed when the container reports none.
const FALLBACK_SAMPLE_RATE: u32 = 44_100;

/// Samples per MPEG audio Layer III frame. MPEG-2/2.5 streams (below 32 kHz)
/// carry half as many.
pub(crate) fn samples_per_frame(sample_rate: u32) -> u64 {
    if sample_rate < 32_000 { 576 } else { 1152 }
}

pub(crate) fn frame_count(length_ms: u64, sample_rate: u32) -> u64 {
    let samples = length_ms as u128 * sample_rate as u128 / 1000;
    (samples / samples_per_frame(sample_rate) as u128) as u64
}

fn field(value: Option<std::borrow::Cow<'_, str>>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN_FIELD.to_string())
}

impl MetadataReader for LoftyReader {
    fn read(&self, path: &Path) -> Option<TrackMetadata> {
        let tagged = match lofty::read_from_path(path) {
            Ok(t) => t,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "lofty could not parse file");
                return None;
            }
        };

        let properties = tagged.properties();
        let length_ms = properties.duration().as_millis() as u64;
        let sample_rate = properties.sample_rate().unwrap_or(FALLBACK_SAMPLE_RATE);

        let mut metadata = TrackMetadata {
            length_ms,
            total_frames: frame_count(length_ms, sample_rate),
            ..TrackMetadata::default()
        };

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            metadata.title = field(tag.title());
            metadata.artist = field(tag.artist());
            metadata.genre = field(tag.genre());
        }

        Some(metadata)
    }
}

impl Track {
    /// Open the file at `path`, filling in metadata from `reader`.
    ///
    /// A missing file is a load failure; unreadable metadata is not, the
    /// track just carries `N/A` fields and an unknown length.
    pub fn open(path: impl AsRef<Path>, reader: &dyn MetadataReader) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(PlayerError::track_load(path, "file not found"));
        }

        let metadata = reader.read(path).unwrap_or_else(|| {
            warn!(path = %path.display(), "metadata unavailable, using defaults");
            TrackMetadata::default()
        });

        Ok(Track::new(path, metadata))
    }
}
