//! Session events emitted by the orchestrator.
//!
//! Delivered over a [`tokio::sync::broadcast`] channel; a slow or absent
//! subscriber never blocks editing.

use serde::Serialize;

use crate::error::ErrorKind;
use crate::types::Timestamp;

/// Whether a transformation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    Idle,
    Pending,
}

/// What happened.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EditEventKind {
    /// A new source image started a fresh history.
    Loaded { width: u32, height: u32 },

    /// The orchestrator moved between `Idle` and `Pending`.
    StateChanged { state: EditState },

    /// A transformation succeeded and became the current version.
    Committed {
        operation: &'static str,
        cursor: usize,
        versions: usize,
    },

    /// A transformation failed; history is unchanged.
    Failed {
        operation: &'static str,
        kind: ErrorKind,
        detail: String,
    },

    /// Undo or redo moved the cursor.
    Moved {
        cursor: usize,
        can_undo: bool,
        can_redo: bool,
    },
}

/// A timestamped [`EditEventKind`].
#[derive(Debug, Clone, Serialize)]
pub struct EditEvent {
    pub at: Timestamp,
    #[serde(flatten)]
    pub kind: EditEventKind,
}

impl EditEvent {
    pub fn now(kind: EditEventKind) -> Self {
        Self {
            at: chrono::Utc::now(),
            kind,
        }
    }
}
