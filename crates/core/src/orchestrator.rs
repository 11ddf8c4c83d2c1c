//! Single-flight coordination of edits against the version chain.
//!
//! [`EditOrchestrator`] owns the [`HistoryStore`] and a gateway. A submit
//! moves the session from `Idle` to `Pending`, awaits exactly one gateway
//! call (bounded by a timeout), then commits on success or leaves history
//! untouched on failure before returning to `Idle`. Any call that needs
//! `Idle` while a request is in flight gets `Busy`.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::error::EditError;
use crate::events::{EditEvent, EditEventKind, EditState};
use crate::gateway::{TransformGateway, TransformOutcome};
use crate::history::HistoryStore;
use crate::types::{ImageResource, TransformRequest};
use crate::validation::validate_request;

/// Broadcast channel capacity for session events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timeout applied by [`EditOrchestrator::new`].
pub const DEFAULT_EDIT_TIMEOUT: Duration = Duration::from_secs(60);

/// Point-in-time view of the history for UI controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistorySnapshot {
    pub state: EditState,
    pub cursor: usize,
    pub versions: usize,
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Coordinates edits for one editing session.
///
/// Share it behind an `Arc`; all methods take `&self`. No lock is held
/// across the gateway call, so reads (`current`, `snapshot`, ...) stay
/// available while a request is pending.
pub struct EditOrchestrator<G> {
    gateway: G,
    session: Mutex<Session>,
    event_tx: broadcast::Sender<EditEvent>,
    timeout: Duration,
}

struct Session {
    history: HistoryStore,
    state: EditState,
}

impl<G: TransformGateway> EditOrchestrator<G> {
    pub fn new(gateway: G) -> Self {
        Self::with_timeout(gateway, DEFAULT_EDIT_TIMEOUT)
    }

    /// Create an orchestrator whose submits give up after `timeout`.
    pub fn with_timeout(gateway: G, timeout: Duration) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            gateway,
            session: Mutex::new(Session {
                history: HistoryStore::new(),
                state: EditState::Idle,
            }),
            event_tx,
            timeout,
        }
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<EditEvent> {
        self.event_tx.subscribe()
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a new session from `original`, discarding any previous history.
    pub fn load(&self, original: ImageResource) -> Result<(), EditError> {
        let mut session = self.lock();
        if session.state == EditState::Pending {
            return Err(EditError::Busy);
        }
        session.history.reset();
        session.history.initialize(original.clone())?;
        drop(session);

        tracing::info!(
            width = original.width(),
            height = original.height(),
            content_type = %original.content_type(),
            "Loaded source image",
        );
        self.emit(EditEventKind::Loaded {
            width: original.width(),
            height: original.height(),
        });
        Ok(())
    }

    /// Apply `request` to the current version with the default timeout.
    pub async fn submit(&self, request: TransformRequest) -> TransformOutcome {
        self.submit_with_timeout(request, self.timeout).await
    }

    /// Apply `request` to the current version, abandoning the gateway call
    /// after `timeout`.
    ///
    /// On success the returned resource is the new current version. On
    /// failure history is exactly as it was before the call. If the
    /// returned future is dropped mid-flight the session returns to `Idle`
    /// and history is untouched.
    pub async fn submit_with_timeout(
        &self,
        request: TransformRequest,
        timeout: Duration,
    ) -> TransformOutcome {
        let operation = request.label();
        let base = self.begin(&request)?;
        let mut pending = PendingGuard {
            orchestrator: self,
            armed: true,
        };

        let request_id = uuid::Uuid::new_v4();
        tracing::info!(
            %request_id,
            operation,
            timeout_ms = millis(timeout),
            "Submitting transformation",
        );

        let outcome = match tokio::time::timeout(timeout, self.gateway.invoke(base, request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(EditError::TransportError(format!(
                "no response within {}ms",
                millis(timeout)
            ))),
        };

        pending.armed = false;
        self.finish(request_id, operation, outcome)
    }

    /// Step back one version. A no-op at the original.
    pub fn request_undo(&self) -> Result<ImageResource, EditError> {
        self.step(HistoryStore::undo)
    }

    /// Step forward one version. A no-op at the tip.
    pub fn request_redo(&self) -> Result<ImageResource, EditError> {
        self.step(HistoryStore::redo)
    }

    pub fn current(&self) -> Result<ImageResource, EditError> {
        self.lock().history.current()
    }

    /// The originally loaded image, for before/after comparison.
    pub fn original(&self) -> Result<ImageResource, EditError> {
        self.lock().history.original()
    }

    pub fn can_undo(&self) -> bool {
        self.lock().history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().history.can_redo()
    }

    pub fn state(&self) -> EditState {
        self.lock().state
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        let session = self.lock();
        HistorySnapshot {
            state: session.state,
            cursor: session.history.cursor(),
            versions: session.history.len(),
            can_undo: session.history.can_undo(),
            can_redo: session.history.can_redo(),
        }
    }

    // ---- private helpers ----

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, kind: EditEventKind) {
        // No subscribers is fine.
        let _ = self.event_tx.send(EditEvent::now(kind));
    }

    /// Idle -> Pending. Validation failures are reported without entering
    /// `Pending` and without reaching the gateway.
    fn begin(&self, request: &TransformRequest) -> Result<ImageResource, EditError> {
        let mut session = self.lock();
        if session.state == EditState::Pending {
            tracing::debug!(operation = request.label(), "Rejected submit while pending");
            return Err(EditError::Busy);
        }

        let base = session.history.current()?;
        if let Err(e) = validate_request(&base, request) {
            drop(session);
            tracing::info!(
                operation = request.label(),
                kind = %e.kind(),
                error = %e,
                "Transformation rejected locally",
            );
            self.emit(EditEventKind::Failed {
                operation: request.label(),
                kind: e.kind(),
                detail: e.detail(),
            });
            return Err(e);
        }

        session.state = EditState::Pending;
        drop(session);

        self.emit(EditEventKind::StateChanged {
            state: EditState::Pending,
        });
        Ok(base)
    }

    /// Pending -> Idle, committing on success.
    fn finish(
        &self,
        request_id: uuid::Uuid,
        operation: &'static str,
        outcome: TransformOutcome,
    ) -> TransformOutcome {
        let mut session = self.lock();
        session.state = EditState::Idle;

        let result = match outcome {
            Ok(resource) => session.history.commit(resource.clone()).map(|()| resource),
            Err(e) => Err(e),
        };
        let (cursor, versions) = (session.history.cursor(), session.history.len());
        drop(session);

        match &result {
            Ok(resource) => {
                tracing::info!(
                    %request_id,
                    operation,
                    cursor,
                    versions,
                    width = resource.width(),
                    height = resource.height(),
                    "Transformation committed",
                );
                self.emit(EditEventKind::Committed {
                    operation,
                    cursor,
                    versions,
                });
            }
            Err(e) => {
                tracing::warn!(
                    %request_id,
                    operation,
                    kind = %e.kind(),
                    error = %e,
                    "Transformation failed",
                );
                self.emit(EditEventKind::Failed {
                    operation,
                    kind: e.kind(),
                    detail: e.detail(),
                });
            }
        }
        self.emit(EditEventKind::StateChanged {
            state: EditState::Idle,
        });

        result
    }

    fn step(&self, move_cursor: fn(&mut HistoryStore) -> bool) -> Result<ImageResource, EditError> {
        let mut session = self.lock();
        if session.state == EditState::Pending {
            return Err(EditError::Busy);
        }
        let moved = move_cursor(&mut session.history);
        let current = session.history.current()?;
        let (cursor, can_undo, can_redo) = (
            session.history.cursor(),
            session.history.can_undo(),
            session.history.can_redo(),
        );
        drop(session);

        if moved {
            tracing::debug!(cursor, can_undo, can_redo, "History cursor moved");
            self.emit(EditEventKind::Moved {
                cursor,
                can_undo,
                can_redo,
            });
        }
        Ok(current)
    }
}

/// Whole milliseconds of `duration`, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Returns the session to `Idle` if a submit future is dropped before its
/// outcome is recorded.
struct PendingGuard<'a, G> {
    orchestrator: &'a EditOrchestrator<G>,
    armed: bool,
}

impl<G> Drop for PendingGuard<'_, G> {
    fn drop(&mut self) {
        if self.armed {
            let mut session = self
                .orchestrator
                .session
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            session.state = EditState::Idle;
            drop(session);

            tracing::info!("Pending transformation abandoned");
            let _ = self.orchestrator.event_tx.send(EditEvent::now(
                EditEventKind::StateChanged {
                    state: EditState::Idle,
                },
            ));
        }
    }
}
