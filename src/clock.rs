//! Frame/time conversions for a single track.
//!
//! Positions are tracked as frame offsets (what the decoder seeks by) and as
//! elapsed milliseconds (what a listener sees). A track's frame rate is
//! `total_frames / length_ms`; `scale` is a calibration multiplier that stays
//! at 1.0 unless a file set is measured to drift.

use std::time::Duration;

/// A position inside the current track.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub frame_offset: u64,
    pub elapsed_ms: u64,
}

impl Position {
    pub const ZERO: Self = Self {
        frame_offset: 0,
        elapsed_ms: 0,
    };
}

/// Convert elapsed milliseconds to a frame offset, rounding to the nearest frame.
pub fn to_frame(elapsed_ms: u64, frames_per_ms: f64, scale: f64) -> u64 {
    let frame = elapsed_ms as f64 * frames_per_ms * scale;
    if frame.is_finite() && frame > 0.0 {
        frame.round() as u64
    } else {
        0
    }
}

/// Convert a frame offset back to elapsed milliseconds. A zero rate maps everything to 0.
pub fn to_elapsed_ms(frame_offset: u64, frames_per_ms: f64, scale: f64) -> u64 {
    let rate = frames_per_ms * scale;
    if !rate.is_finite() || rate <= 0.0 {
        return 0;
    }
    (frame_offset as f64 / rate).round() as u64
}

/// Share of the track covered by `frame`, clamped to `0.0..=1.0`.
pub fn fraction(frame: u64, total_frames: u64) -> f64 {
    if total_frames == 0 {
        return 0.0;
    }
    (frame as f64 / total_frames as f64).clamp(0.0, 1.0)
}

/// `mm:ss`, minutes are not wrapped into hours.
pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Conversion helper bound to one track's frame rate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PositionClock {
    frames_per_ms: f64,
    scale: f64,
}

impl PositionClock {
    pub fn new(frames_per_ms: f64, scale: f64) -> Self {
        Self {
            frames_per_ms,
            scale,
        }
    }

    pub fn to_frame(&self, elapsed_ms: u64) -> u64 {
        to_frame(elapsed_ms, self.frames_per_ms, self.scale)
    }

    pub fn to_elapsed_ms(&self, frame_offset: u64) -> u64 {
        to_elapsed_ms(frame_offset, self.frames_per_ms, self.scale)
    }

    /// Both representations of `frame_offset`.
    pub fn position_at(&self, frame_offset: u64) -> Position {
        Position {
            frame_offset,
            elapsed_ms: self.to_elapsed_ms(frame_offset),
        }
    }

    /// Whether frames can be mapped to time. Tracks without length metadata
    /// have no rate; their positions only advance in milliseconds.
    pub fn has_rate(&self) -> bool {
        let rate = self.frames_per_ms * self.scale;
        rate.is_finite() && rate > 0.0
    }

    /// Absolute position after `elapsed` of output that began at `start`.
    pub fn advanced(&self, start: Position, elapsed: Duration) -> Position {
        let elapsed_ms = elapsed.as_millis() as u64;
        Position {
            frame_offset: start.frame_offset + self.to_frame(elapsed_ms),
            elapsed_ms: start.elapsed_ms + elapsed_ms,
        }
    }

    /// Engine start offset for `frame_offset`.
    pub fn duration_of(&self, frame_offset: u64) -> Duration {
        Duration::from_millis(self.to_elapsed_ms(frame_offset))
    }
}
