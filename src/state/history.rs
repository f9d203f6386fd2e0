/// Linear undo/redo over parameter-set changes
///
/// Entries left of the cursor are applied, entries right of it can be
/// redone. Committing while the cursor is not at the end drops the redo
/// branch.

use super::edit::{Adjustment, EditParams, TransformOp};

/// One committed change with enough information to invert it
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryEntry {
    /// A scalar field moved from `old` to `new`
    Adjust { old: Adjustment, new: Adjustment },
    /// A transform was appended; its inverse removes it again
    Transform(TransformOp),
    /// Everything went back to defaults
    Reset { previous: EditParams },
}

impl HistoryEntry {
    /// Re-apply this change
    pub fn apply(&self, params: &mut EditParams) {
        match self {
            HistoryEntry::Adjust { new, .. } => params.set(*new),
            HistoryEntry::Transform(op) => params.transforms.push(*op),
            HistoryEntry::Reset { .. } => params.reset(),
        }
    }

    /// Undo this change
    pub fn revert(&self, params: &mut EditParams) {
        match self {
            HistoryEntry::Adjust { old, .. } => params.set(*old),
            HistoryEntry::Transform(op) => {
                if params.transforms.last() == Some(op) {
                    params.transforms.pop();
                } else {
                    log::warn!("history out of sync: expected trailing {:?}", op);
                }
            }
            HistoryEntry::Reset { previous } => *params = previous.clone(),
        }
    }

    /// Short description for the UI
    pub fn label(&self) -> String {
        match self {
            HistoryEntry::Adjust { new, .. } => new.field().name().to_string(),
            HistoryEntry::Transform(op) => op.name().to_string(),
            HistoryEntry::Reset { .. } => "reset".to_string(),
        }
    }
}

/// Where the cursor sits relative to the entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    Empty,
    AtStart,
    Mid,
    AtEnd,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HistoryState {
        if self.entries.is_empty() {
            HistoryState::Empty
        } else if self.cursor == 0 {
            HistoryState::AtStart
        } else if self.cursor == self.entries.len() {
            HistoryState::AtEnd
        } else {
            HistoryState::Mid
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    /// Record a change that has already been applied to the parameters
    pub fn commit(&mut self, entry: HistoryEntry) {
        if self.cursor < self.entries.len() {
            self.entries.truncate(self.cursor);
        }
        self.entries.push(entry);
        self.cursor = self.entries.len();
    }

    /// Step back one entry. Returns false when there is nothing to undo.
    pub fn undo(&mut self, params: &mut EditParams) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.entries[self.cursor].revert(params);
        true
    }

    /// Step forward one entry. Returns false when there is nothing to redo.
    pub fn redo(&mut self, params: &mut EditParams) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.entries[self.cursor].apply(params);
        self.cursor += 1;
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
