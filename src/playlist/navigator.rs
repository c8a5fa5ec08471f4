//! Bounds-checked index walking over a playlist.
//!
//! There is no wrap-around: stepping past either end yields `None` and the
//! caller leaves playback untouched.

pub fn next_index(index: usize, len: usize) -> Option<usize> {
    let next = index.checked_add(1)?;
    (next < len).then_some(next)
}

pub fn previous_index(index: usize) -> Option<usize> {
    index.checked_sub(1)
}

/// Current position inside an attached playlist.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    index: usize,
}

impl Navigator {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_last(&self, len: usize) -> bool {
        next_index(self.index, len).is_none()
    }

    /// Index after the current one, without moving.
    pub fn peek_next(&self, len: usize) -> Option<usize> {
        next_index(self.index, len)
    }

    pub fn peek_previous(&self) -> Option<usize> {
        previous_index(self.index)
    }

    pub fn jump(&mut self, index: usize) {
        self.index = index;
    }
}
