use std::sync::mpsc::Sender;

use crate::clock::Position;
use crate::library::Track;

use super::types::PlaybackState;

/// Receives session events. Called on the session thread, so implementations
/// should hand work off rather than block.
pub trait PlaybackObserver: Send + Sync {
    fn position_changed(&self, _position: Position) {}
    fn track_changed(&self, _track: &Track) {}
    fn state_changed(&self, _state: PlaybackState) {}
}

#[derive(Debug, Default, Copy, Clone)]
pub struct NullObserver;

impl PlaybackObserver for NullObserver {}

/// Observer events as values, for channel-driven front-ends.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    PositionChanged(Position),
    TrackChanged(Track),
    StateChanged(PlaybackState),
}

impl PlaybackObserver for Sender<PlayerEvent> {
    fn position_changed(&self, position: Position) {
        let _ = self.send(PlayerEvent::PositionChanged(position));
    }

    fn track_changed(&self, track: &Track) {
        let _ = self.send(PlayerEvent::TrackChanged(track.clone()));
    }

    fn state_changed(&self, state: PlaybackState) {
        let _ = self.send(PlayerEvent::StateChanged(state));
    }
}
