//! Tests for the page session state machine with a mock surface.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use warden_error::{PaginationErrorKind, WardenErrorKind};
use warden_social::{MessageSurface, PageSession, RenderFailure, SessionRegistry};

/// What the mock surface should do on the next render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RenderScript {
    Succeed,
    Stale,
    Transient,
}

#[derive(Default)]
struct SurfaceLog {
    shown: Vec<String>,
    strips: usize,
    deletes: usize,
}

/// Scriptable in-memory message surface.
#[derive(Clone)]
struct MockSurface {
    log: Arc<Mutex<SurfaceLog>>,
    script: Arc<Mutex<RenderScript>>,
}

impl MockSurface {
    fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(SurfaceLog::default())),
            script: Arc::new(Mutex::new(RenderScript::Succeed)),
        }
    }

    fn script(&self, script: RenderScript) {
        *self.script.lock().unwrap() = script;
    }

    fn shown(&self) -> Vec<String> {
        self.log.lock().unwrap().shown.clone()
    }

    fn strips(&self) -> usize {
        self.log.lock().unwrap().strips
    }

    fn deletes(&self) -> usize {
        self.log.lock().unwrap().deletes
    }
}

#[async_trait]
impl MessageSurface for MockSurface {
    type Page = String;

    async fn show_page(&mut self, page: &String) -> Result<(), RenderFailure> {
        match *self.script.lock().unwrap() {
            RenderScript::Succeed => {
                self.log.lock().unwrap().shown.push(page.clone());
                Ok(())
            }
            RenderScript::Stale => Err(RenderFailure::Stale),
            RenderScript::Transient => {
                Err(RenderFailure::Transient("edit timed out".to_string()))
            }
        }
    }

    async fn delete(&mut self) -> Result<(), RenderFailure> {
        self.log.lock().unwrap().deletes += 1;
        Ok(())
    }

    async fn strip_controls(&mut self) -> Result<(), RenderFailure> {
        self.log.lock().unwrap().strips += 1;
        Ok(())
    }
}

const OWNER: u64 = 100;
const STRANGER: u64 = 200;

fn pages() -> Vec<String> {
    vec!["A".to_string(), "B".to_string(), "C".to_string()]
}

fn session(surface: &MockSurface) -> PageSession<MockSurface> {
    PageSession::new(OWNER, pages(), surface.clone(), Duration::from_secs(60)).unwrap()
}

#[tokio::test]
async fn next_walks_forward_and_wraps_to_the_first_page() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.next(OWNER).await;
    session.next(OWNER).await;
    session.next(OWNER).await;

    // B, C, then back around to A
    assert_eq!(surface.shown(), ["B", "C", "A"]);
    assert_eq!(session.current_index(), 0);
    assert!(session.is_active());
}

#[tokio::test]
async fn prev_from_the_first_page_wraps_to_the_last() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.prev(OWNER).await;

    assert_eq!(surface.shown(), ["C"]);
    assert_eq!(session.current_index(), 2);
}

#[tokio::test]
async fn deep_negative_indexes_stay_in_range() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    for _ in 0..7 {
        session.prev(OWNER).await;
    }

    // 0 - 7 = -7, floored mod 3 = 2
    assert_eq!(session.current_index(), 2);
    assert_eq!(surface.shown().last().map(String::as_str), Some("C"));
}

#[tokio::test]
async fn unauthorized_actions_change_nothing() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.next(STRANGER).await;
    session.prev(STRANGER).await;
    session.delete(STRANGER).await;

    assert!(surface.shown().is_empty());
    assert_eq!(surface.deletes(), 0);
    assert_eq!(session.current_index(), 0);
    assert!(session.is_active());
}

#[tokio::test]
async fn empty_page_sequence_is_rejected_at_construction() {
    let surface = MockSurface::new();
    let err = PageSession::new(OWNER, Vec::new(), surface, Duration::from_secs(60))
        .err()
        .unwrap();
    assert_eq!(err.kind, PaginationErrorKind::EmptyPages);

    // and the error folds into the workspace error type
    let top: warden_error::WardenError = err.into();
    assert!(matches!(top.kind(), WardenErrorKind::Pagination(_)));
}

#[tokio::test]
async fn delete_removes_the_message_and_terminates() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.delete(OWNER).await;

    assert_eq!(surface.deletes(), 1);
    assert!(!session.is_active());

    // further navigation is ignored
    session.next(OWNER).await;
    assert!(surface.shown().is_empty());
}

#[tokio::test]
async fn timeout_strips_controls_exactly_once() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.on_timeout().await;
    session.on_timeout().await;

    assert_eq!(surface.strips(), 1);
    assert!(!session.is_active());
}

#[tokio::test]
async fn timeout_after_delete_is_a_no_op() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    session.delete(OWNER).await;
    session.on_timeout().await;

    assert_eq!(surface.deletes(), 1);
    assert_eq!(surface.strips(), 0);
}

#[tokio::test]
async fn stale_render_terminates_and_strips_best_effort() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    surface.script(RenderScript::Stale);
    session.next(OWNER).await;

    assert!(!session.is_active());
    assert_eq!(surface.strips(), 1);

    // termination was silent and final
    surface.script(RenderScript::Succeed);
    session.next(OWNER).await;
    assert!(surface.shown().is_empty());
}

#[tokio::test]
async fn transient_render_failure_keeps_the_session_alive() {
    let surface = MockSurface::new();
    let mut session = session(&surface);

    surface.script(RenderScript::Transient);
    session.next(OWNER).await;

    assert!(session.is_active());
    assert_eq!(surface.strips(), 0);

    // the next render picks up from the advanced index
    surface.script(RenderScript::Succeed);
    session.next(OWNER).await;
    assert_eq!(surface.shown(), ["C"]);
}

#[tokio::test]
async fn registry_routes_by_message_id_and_drops_terminated_sessions() {
    let surface_a = MockSurface::new();
    let surface_b = MockSurface::new();
    let registry = SessionRegistry::new();

    registry.insert(1, session(&surface_a)).await;
    registry.insert(2, session(&surface_b)).await;
    assert_eq!(registry.len().await, 2);

    registry.next(1, OWNER).await;
    assert_eq!(surface_a.shown(), ["B"]);
    assert!(surface_b.shown().is_empty());

    registry.delete(2, OWNER).await;
    assert_eq!(surface_b.deletes(), 1);
    assert_eq!(registry.len().await, 1);

    // deleting again hits nothing
    registry.delete(2, OWNER).await;
    assert_eq!(surface_b.deletes(), 1);
}

#[tokio::test]
async fn registry_expiry_races_cleanly_with_manual_deletion() {
    let surface = MockSurface::new();
    let registry = SessionRegistry::new();
    registry.insert(1, session(&surface)).await;

    registry.delete(1, OWNER).await;
    registry.expire(1).await;

    // the expiry found nothing left to clean up
    assert_eq!(surface.deletes(), 1);
    assert_eq!(surface.strips(), 0);
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn registry_expiry_strips_live_sessions() {
    let surface = MockSurface::new();
    let registry = SessionRegistry::new();
    registry.insert(1, session(&surface)).await;

    registry.expire(1).await;

    assert_eq!(surface.strips(), 1);
    assert!(registry.is_empty().await);

    // navigation after expiry is a no-op
    registry.next(1, OWNER).await;
    assert!(surface.shown().is_empty());
}
