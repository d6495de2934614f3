//! Undo and redo stacks built from deep layout snapshots.

use bastion_core::LayoutSnapshot;

/// Paired undo/redo stacks of owned layout snapshots.
///
/// Recording pushes the pre-mutation state onto the undo stack and discards
/// the redo stack; traversal swaps the live state with the popped snapshot so
/// that walking back and forth never loses a state.
#[derive(Debug, Default)]
pub(crate) struct History {
    undo: Vec<LayoutSnapshot>,
    redo: Vec<LayoutSnapshot>,
}

impl History {
    /// Creates a history with both stacks empty.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a pre-mutation snapshot, invalidating the redo stack.
    pub(crate) fn record(&mut self, snapshot: LayoutSnapshot) {
        self.undo.push(snapshot);
        self.redo.clear();
    }

    /// Pops the most recent undo snapshot, parking `current` on the redo
    /// stack. Returns `None` when there is nothing to undo.
    pub(crate) fn undo(&mut self, current: LayoutSnapshot) -> Option<LayoutSnapshot> {
        let restored = self.undo.pop()?;
        self.redo.push(current);
        Some(restored)
    }

    /// Pops the most recent redo snapshot, parking `current` on the undo
    /// stack. Returns `None` when there is nothing to redo.
    pub(crate) fn redo(&mut self, current: LayoutSnapshot) -> Option<LayoutSnapshot> {
        let restored = self.redo.pop()?;
        self.undo.push(current);
        Some(restored)
    }

    /// Discards both stacks.
    pub(crate) fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Reports whether an undo snapshot is available.
    pub(crate) fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Reports whether a redo snapshot is available.
    pub(crate) fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
