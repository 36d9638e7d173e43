use std::sync::Arc;

use crate::stroke::StrokeRef;

/// Linear undo/redo record of committed strokes.
///
/// Strokes before the cursor are active (visible and exported); strokes after
/// it form the redo buffer. Committing while the cursor is not at the end
/// discards the redo buffer.
#[derive(Debug, Clone, Default)]
pub struct History {
    strokes: Vec<StrokeRef>,
    /// Number of active strokes, i.e. `current_index + 1`
    cursor: usize,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finished stroke, dropping any redo entries first
    pub fn commit(&mut self, stroke: StrokeRef) {
        self.strokes.truncate(self.cursor);
        self.strokes.push(stroke);
        self.cursor = self.strokes.len();
    }

    /// Step the cursor back. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step the cursor forward. Returns false at the end of the history.
    pub fn redo(&mut self) -> bool {
        if self.cursor >= self.strokes.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    /// Drop every stroke. Returns false if it was already empty.
    pub fn clear(&mut self) -> bool {
        let changed = !self.strokes.is_empty();
        self.strokes.clear();
        self.cursor = 0;
        changed
    }

    /// Index of the last active stroke, `None` when nothing is active
    pub fn current_index(&self) -> Option<usize> {
        self.cursor.checked_sub(1)
    }

    /// Strokes that are currently visible, in paint order
    pub fn active_strokes(&self) -> &[StrokeRef] {
        &self.strokes[..self.cursor]
    }

    /// Every stored stroke, including the redo buffer
    pub fn strokes(&self) -> &[StrokeRef] {
        &self.strokes
    }

    pub fn active_len(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.strokes.len()
    }

    /// True if both histories hold the very same stroke objects at the same cursor
    pub fn same_strokes(&self, other: &History) -> bool {
        self.cursor == other.cursor
            && self.strokes.len() == other.strokes.len()
            && self
                .strokes
                .iter()
                .zip(&other.strokes)
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}
