//! The playback session.
//!
//! A single thread owns the session record (state, current track, attached
//! playlist, position and the halt marker). Transport commands, output
//! terminal notifications and ticker samples all arrive through one inbox and
//! are handled in order, so no flag is ever read or written from two threads.
//!
//! Position flows one way: the output engine reports how much audio it has
//! played, the driver turns that into an absolute frame with the track's
//! clock, and the session pushes it to the observer.

mod controller;
mod driver;
mod handle;
mod observer;
mod ticker;
mod types;

pub use handle::Session;
pub use observer::{NullObserver, PlaybackObserver, PlayerEvent};
pub use types::{PlaybackHandle, PlaybackInfo, PlaybackState};
