use std::collections::VecDeque;

use crate::foundation::error::{MaskError, MaskResult};
use crate::raster::bitmap::DisplayBitmap;

/// One undo step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryEntry {
    /// Display contents after a stroke (pre-stroke contents while the stroke is open).
    Draw { snapshot: DisplayBitmap },
    /// Empty canvas.
    Clear,
}

impl HistoryEntry {
    /// Restore the display bitmap to the state this entry describes.
    pub fn apply_to(&self, bitmap: &mut DisplayBitmap) -> MaskResult<()> {
        match self {
            HistoryEntry::Clear => {
                bitmap.clear();
                Ok(())
            }
            HistoryEntry::Draw { snapshot } => {
                if snapshot.size() != bitmap.size() {
                    return Err(MaskError::validation(format!(
                        "history snapshot is {}, display is {}",
                        snapshot.size(),
                        bitmap.size()
                    )));
                }
                bitmap.clone_from(snapshot);
                Ok(())
            }
        }
    }
}

/// Entries kept when no limit is given, base state included.
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 50;

/// Linear undo/redo stack with a cursor.
///
/// Never empty: it starts with a single [`HistoryEntry::Clear`] at index 0, which is where a
/// full undo ends up. Pushing while the cursor is not at the top drops the redo branch. Once
/// more than `max_entries` are held, the oldest are dropped and the next one becomes the base.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
    index: usize,
    max_entries: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_HISTORY_ENTRIES)
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// At least two entries are always kept so a single step can be undone.
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::from([HistoryEntry::Clear]),
            index: 0,
            max_entries: max_entries.max(2),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::with_limit(self.max_entries);
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn push(&mut self, entry: HistoryEntry) {
        if self.can_redo() {
            self.entries.truncate(self.index + 1);
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
        self.index = self.entries.len() - 1;
    }

    /// Replace the snapshot of the current `Draw` entry with the finished stroke state.
    pub fn seal(&mut self, snapshot: DisplayBitmap) -> MaskResult<()> {
        match &mut self.entries[self.index] {
            HistoryEntry::Draw { snapshot: slot } => {
                *slot = snapshot;
                Ok(())
            }
            HistoryEntry::Clear => Err(MaskError::validation(
                "cannot seal a stroke: current history entry is a clear",
            )),
        }
    }

    /// Step back. Returns the entry to restore, or `None` at the first entry.
    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward. Returns the entry to restore, or `None` at the last entry.
    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/stack.rs"]
mod tests;
