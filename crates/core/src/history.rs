//! Linear version chain with undo/redo.
//!
//! Index 0 is always the original upload. Committing while the cursor is
//! behind the tip discards the redo tail; history never branches.

use crate::error::EditError;
use crate::types::ImageResource;

/// Ordered image versions plus the cursor of the displayed one.
///
/// Holds no lock of its own; the orchestrator serializes all mutations.
#[derive(Debug, Default)]
pub struct HistoryStore {
    versions: Vec<ImageResource>,
    cursor: usize,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a chain with `original` as version 0.
    pub fn initialize(&mut self, original: ImageResource) -> Result<(), EditError> {
        if self.is_initialized() {
            return Err(EditError::AlreadyInitialized);
        }
        self.versions.push(original);
        self.cursor = 0;
        Ok(())
    }

    /// Drop every version after the cursor, append `resource`, and move the
    /// cursor to it.
    pub fn commit(&mut self, resource: ImageResource) -> Result<(), EditError> {
        if !self.is_initialized() {
            return Err(EditError::NotInitialized);
        }
        self.versions.truncate(self.cursor + 1);
        self.versions.push(resource);
        self.cursor = self.versions.len() - 1;
        Ok(())
    }

    /// Step back one version. Returns `false` when already at the original
    /// (or uninitialized).
    pub fn undo(&mut self) -> bool {
        if self.can_undo() {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// Step forward one version. Returns `false` when already at the tip.
    pub fn redo(&mut self) -> bool {
        if self.can_redo() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    pub fn current(&self) -> Result<ImageResource, EditError> {
        self.versions
            .get(self.cursor)
            .cloned()
            .ok_or(EditError::NotInitialized)
    }

    /// Version 0, regardless of the cursor.
    pub fn original(&self) -> Result<ImageResource, EditError> {
        self.versions.first().cloned().ok_or(EditError::NotInitialized)
    }

    pub fn can_undo(&self) -> bool {
        self.is_initialized() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.is_initialized() && self.cursor + 1 < self.versions.len()
    }

    /// Forget everything; `current` fails until the next `initialize`.
    pub fn reset(&mut self) {
        self.versions.clear();
        self.cursor = 0;
    }

    pub fn is_initialized(&self) -> bool {
        !self.versions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// All reachable versions, oldest first.
    pub fn versions(&self) -> &[ImageResource] {
        &self.versions
    }
}
