//! End-to-end behaviour of the edit orchestrator against a scripted gateway:
//! the user-facing scenarios plus the history and single-flight invariants.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use common::{image, ScriptedGateway};
use retouch_core::error::EditError;
use retouch_core::events::{EditEventKind, EditState};
use retouch_core::history::HistoryStore;
use retouch_core::orchestrator::EditOrchestrator;
use retouch_core::types::{Hotspot, Rect, TransformRequest};

fn filter(style: &str) -> TransformRequest {
    TransformRequest::Filter {
        style: style.to_string(),
    }
}

fn adjustment(text: &str) -> TransformRequest {
    TransformRequest::Adjustment {
        adjustment: text.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

/// Filter success commits the new version.
#[tokio::test]
async fn scenario_a_filter_commits() {
    let (i0, i1) = (image(100, 100, 0), image(100, 100, 1));
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0.clone()).unwrap();
    orch.gateway().push(Ok(i1.clone()));

    let result = orch.submit(filter("vintage sepia")).await.unwrap();

    assert_eq!(result, i1);
    assert_eq!(orch.current().unwrap(), i1);
    assert!(orch.can_undo());
    assert!(!orch.can_redo());
    assert_eq!(orch.gateway().requests(), vec![filter("vintage sepia")]);
}

/// Undo and redo walk the chain.
#[tokio::test]
async fn scenario_b_undo_redo() {
    let (i0, i1) = (image(100, 100, 0), image(100, 100, 1));
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0.clone()).unwrap();
    orch.gateway().push(Ok(i1.clone()));
    orch.submit(filter("vintage sepia")).await.unwrap();

    assert_eq!(orch.request_undo().unwrap(), i0);
    assert_eq!(orch.current().unwrap(), i0);
    assert_eq!(orch.request_redo().unwrap(), i1);
    assert_eq!(orch.current().unwrap(), i1);
}

/// An off-canvas hotspot is rejected without a gateway call.
#[tokio::test]
async fn scenario_c_invalid_hotspot() {
    let (i0, i1) = (image(100, 100, 0), image(100, 100, 1));
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0).unwrap();
    orch.gateway().push(Ok(i1.clone()));
    orch.submit(filter("vintage sepia")).await.unwrap();
    let calls_before = orch.gateway().calls();

    let result = orch
        .submit(TransformRequest::Retouch {
            hotspot: Hotspot::new(9999, 9999, "remove blemish"),
        })
        .await;

    assert_matches!(result, Err(EditError::InvalidHotspot(_)));
    assert_eq!(orch.gateway().calls(), calls_before);
    assert_eq!(orch.current().unwrap(), i1);
}

/// Committing after undo discards the redo branch.
#[tokio::test]
async fn scenario_d_commit_after_undo_discards_branch() {
    let (i0, i1, i2) = (
        image(100, 100, 0),
        image(100, 100, 1),
        image(100, 100, 2),
    );
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0.clone()).unwrap();
    orch.gateway().push(Ok(i1));
    orch.submit(filter("vintage sepia")).await.unwrap();
    orch.request_undo().unwrap();

    orch.gateway().push(Ok(i2.clone()));
    orch.submit(adjustment("increase brightness")).await.unwrap();

    let snapshot = orch.snapshot();
    assert_eq!(snapshot.versions, 2);
    assert_eq!(snapshot.cursor, 1);
    assert!(!orch.can_redo());
    assert_eq!(orch.current().unwrap(), i2);
    assert_eq!(orch.request_undo().unwrap(), i0);
}

/// Crop succeeds inside bounds and is rejected outside.
#[tokio::test]
async fn scenario_e_crop() {
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(image(100, 100, 0)).unwrap();

    let cropped = orch
        .submit(TransformRequest::Crop {
            rect: Rect::new(0, 0, 50, 50),
        })
        .await
        .unwrap();
    assert_eq!((cropped.width(), cropped.height()), (50, 50));
    assert_eq!(orch.current().unwrap(), cropped);

    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(image(100, 100, 0)).unwrap();
    let result = orch
        .submit(TransformRequest::Crop {
            rect: Rect::new(80, 80, 50, 50),
        })
        .await;
    assert_matches!(result, Err(EditError::InvalidRegion(_)));
    assert_eq!(orch.gateway().calls(), 0);
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

/// Cursor stays in range and version 0 never changes under an arbitrary
/// mix of commit/undo/redo.
#[test]
fn history_cursor_stays_in_bounds() {
    let i0 = image(4, 4, 0);
    let mut history = HistoryStore::new();
    history.initialize(i0.clone()).unwrap();

    // Small LCG so the sequence is reproducible.
    let mut seed: u32 = 0x2545_f491;
    for step in 0..500u32 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        match (seed >> 16) % 3 {
            0 => history.commit(image(4, 4, (step % 250) as u8)).unwrap(),
            1 => {
                history.undo();
            }
            _ => {
                history.redo();
            }
        }
        assert!(history.cursor() < history.len());
        assert_eq!(history.versions()[0], i0);
        assert_eq!(history.can_undo(), history.cursor() > 0);
        assert_eq!(history.can_redo(), history.cursor() + 1 < history.len());
    }
}

/// Versions beyond the cursor are unreachable after a commit.
#[test]
fn redo_branch_is_unreachable_after_commit() {
    let versions: Vec<_> = (0..5).map(|shade| image(4, 4, shade)).collect();
    let mut history = HistoryStore::new();
    history.initialize(versions[0].clone()).unwrap();
    for v in &versions[1..] {
        history.commit(v.clone()).unwrap();
    }
    history.undo();
    history.undo();

    let replacement = image(4, 4, 99);
    history.commit(replacement.clone()).unwrap();

    while history.redo() {}
    assert_eq!(history.current().unwrap(), replacement);
    for discarded in &versions[3..] {
        assert!(!history.versions().contains(discarded));
    }
}

/// Every failure kind leaves history exactly as it was.
#[tokio::test]
async fn failures_leave_history_untouched() {
    let (i0, i1) = (image(100, 100, 0), image(100, 100, 1));
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0).unwrap();
    orch.gateway().push(Ok(i1.clone()));
    orch.submit(filter("noir")).await.unwrap();
    orch.request_undo().unwrap();

    let before = orch.snapshot();
    let current = orch.current().unwrap();

    for failure in [
        EditError::ContentBlocked("SAFETY".into()),
        EditError::MalformedPayload("truncated".into()),
        EditError::TransportError("connection reset".into()),
    ] {
        orch.gateway().push(Err(failure.clone()));
        let result = orch.submit(adjustment("more contrast")).await;
        assert_eq!(result, Err(failure));
        assert_eq!(orch.snapshot(), before);
        assert_eq!(orch.current().unwrap(), current);
        assert!(orch.can_redo(), "redo branch survives a failed edit");
    }
}

/// A second submit while one is pending is `Busy` and never reaches the
/// gateway; undo/redo/load are refused too.
#[tokio::test]
async fn single_flight_rejects_concurrent_requests() {
    let (i0, i1) = (image(100, 100, 0), image(100, 100, 1));
    let orch = Arc::new(EditOrchestrator::new(ScriptedGateway::gated()));
    orch.load(i0.clone()).unwrap();
    orch.gateway().push(Ok(i1.clone()));

    let first = {
        let orch = Arc::clone(&orch);
        tokio::spawn(async move { orch.submit(filter("vintage sepia")).await })
    };
    orch.gateway().wait_started().await;
    assert_eq!(orch.state(), EditState::Pending);

    assert_matches!(orch.submit(filter("noir")).await, Err(EditError::Busy));
    assert_matches!(
        orch.submit(TransformRequest::Crop {
            rect: Rect::new(0, 0, 10, 10)
        })
        .await,
        Err(EditError::Busy)
    );
    assert_matches!(orch.request_undo(), Err(EditError::Busy));
    assert_matches!(orch.request_redo(), Err(EditError::Busy));
    assert_matches!(orch.load(image(10, 10, 5)), Err(EditError::Busy));
    assert_eq!(orch.gateway().calls(), 1);
    // Reads remain available while pending.
    assert_eq!(orch.current().unwrap(), i0);

    orch.gateway().release();
    let committed = first.await.unwrap().unwrap();
    assert_eq!(committed, i1);
    assert_eq!(orch.state(), EditState::Idle);
    assert_eq!(orch.snapshot().versions, 2);
}

/// The event stream reflects the Idle -> Pending -> Idle cycle.
#[tokio::test]
async fn events_trace_a_successful_submit() {
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(image(20, 20, 0)).unwrap();
    let mut events = orch.subscribe();
    orch.gateway().push(Ok(image(20, 20, 1)));

    orch.submit(filter("noir")).await.unwrap();

    let kinds: Vec<_> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|e| e.kind)
        .collect();
    assert_eq!(kinds.len(), 3);
    assert_matches!(
        kinds[0],
        EditEventKind::StateChanged {
            state: EditState::Pending
        }
    );
    assert_matches!(
        kinds[1],
        EditEventKind::Committed {
            operation: "filter",
            cursor: 1,
            versions: 2
        }
    );
    assert_matches!(
        kinds[2],
        EditEventKind::StateChanged {
            state: EditState::Idle
        }
    );
}

/// Undo at the original is a no-op, not an error.
#[tokio::test]
async fn undo_at_original_is_noop() {
    let i0 = image(10, 10, 0);
    let orch = EditOrchestrator::new(ScriptedGateway::new());
    orch.load(i0.clone()).unwrap();
    assert_eq!(orch.request_undo().unwrap(), i0);
    assert_eq!(orch.request_redo().unwrap(), i0);
    assert_eq!(orch.snapshot().cursor, 0);
}
