//! Track model and metadata reading.
//!
//! A [`Track`] is built once from a file path and never changes afterwards;
//! the frame rate derived from its metadata drives all position math.

mod metadata;
mod model;

pub use metadata::{LoftyReader, MetadataReader};
pub use model::{Track, TrackMetadata, UNKNOWN_FIELD};
