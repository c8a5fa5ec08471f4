//! Audio output: the engine seam the playback session drives, and the
//! `rodio` implementation of it.

mod engine;
mod sink;
mod types;

pub use engine::RodioEngine;
pub use types::{OutputEngine, Terminal, TerminalNotifier};
