//! The bounded interactive page session.
//!
//! A [`PageSession`] is a short-lived, single-owner view over an ordered
//! sequence of result pages, with wraparound navigation and a fixed
//! deadline. It is generic over a [`MessageSurface`] so the state machine
//! can be exercised without a gateway connection.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use warden_error::{PaginationError, PaginationErrorKind};

/// How a render or cleanup call against the owning message failed.
///
/// Distinguishing the two cases makes the cleanup path a designed state
/// transition instead of a catch-all: a stale target terminates the
/// session, a transient failure is safe to ignore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderFailure {
    /// The message no longer exists or is no longer editable.
    Stale,
    /// A passing failure; the message is still presumed intact.
    Transient(String),
}

/// The rendered message a session draws on.
///
/// The embedding environment supplies the implementation; the session only
/// needs in-place edits, deletion, and control stripping.
#[async_trait]
pub trait MessageSurface: Send {
    /// The renderable content of one page.
    type Page: Send + Sync;

    /// Replace the rendered content with the given page.
    async fn show_page(&mut self, page: &Self::Page) -> Result<(), RenderFailure>;

    /// Delete the owning message.
    async fn delete(&mut self) -> Result<(), RenderFailure>;

    /// Remove the interactive controls, leaving the content in place.
    async fn strip_controls(&mut self) -> Result<(), RenderFailure>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Active,
    Terminated,
}

/// Single-owner pagination over an ordered, non-empty page sequence.
///
/// The current index is unbounded and wraps via floored modulo, so walking
/// backwards from the first page lands on the last. The deadline is fixed
/// at creation and is not extended by activity; when it elapses the
/// scheduling environment calls [`PageSession::on_timeout`].
///
/// All actions for a session are routed through its single owning
/// instance, so reentrancy is prevented structurally rather than with a
/// mutex.
pub struct PageSession<S: MessageSurface> {
    owner_id: u64,
    pages: Vec<S::Page>,
    index: i64,
    deadline: Instant,
    surface: S,
    state: SessionState,
}

impl<S: MessageSurface> PageSession<S> {
    /// Open a session owned by `owner_id` over `pages`.
    ///
    /// # Errors
    ///
    /// Fails with [`PaginationErrorKind::EmptyPages`] when `pages` is
    /// empty; callers must guarantee at least one page.
    pub fn new(
        owner_id: u64,
        pages: Vec<S::Page>,
        surface: S,
        timeout: Duration,
    ) -> Result<Self, PaginationError> {
        if pages.is_empty() {
            return Err(PaginationError::new(PaginationErrorKind::EmptyPages));
        }
        Ok(Self {
            owner_id,
            pages,
            index: 0,
            deadline: Instant::now() + timeout,
            surface,
            state: SessionState::Active,
        })
    }

    /// Whether `actor_id` may act on this session.
    pub fn authorize(&self, actor_id: u64) -> bool {
        actor_id == self.owner_id
    }

    /// Whether the session is still accepting actions.
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// The wrapped index of the currently rendered page.
    pub fn current_index(&self) -> usize {
        self.index.rem_euclid(self.pages.len() as i64) as usize
    }

    /// The instant at which the session expires.
    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Advance to the next page and re-render.
    ///
    /// Actions from anyone but the owner are ignored without a visible
    /// error, as are actions on a terminated session.
    pub async fn next(&mut self, actor_id: u64) {
        self.step(actor_id, 1).await;
    }

    /// Step back to the previous page and re-render.
    pub async fn prev(&mut self, actor_id: u64) {
        self.step(actor_id, -1).await;
    }

    async fn step(&mut self, actor_id: u64, delta: i64) {
        if !self.is_active() || !self.authorize(actor_id) {
            return;
        }

        self.index += delta;
        let page = &self.pages[self.index.rem_euclid(self.pages.len() as i64) as usize];
        match self.surface.show_page(page).await {
            Ok(()) => {}
            Err(RenderFailure::Stale) => {
                debug!("Render target went stale, terminating session");
                self.terminate_with_strip().await;
            }
            Err(RenderFailure::Transient(reason)) => {
                warn!(%reason, "Transient render failure, keeping session");
            }
        }
    }

    /// Delete the owning message and terminate the session.
    ///
    /// A failed delete still terminates: the session has nothing left to
    /// manage either way.
    pub async fn delete(&mut self, actor_id: u64) {
        if !self.is_active() || !self.authorize(actor_id) {
            return;
        }

        if let Err(failure) = self.surface.delete().await {
            debug!(?failure, "Delete of owning message failed");
        }
        self.state = SessionState::Terminated;
    }

    /// Deadline expiry: strip the controls and terminate.
    ///
    /// Idempotent; a session already terminated by another path is left
    /// untouched, so a race between expiry and manual deletion cleans up
    /// at most once.
    pub async fn on_timeout(&mut self) {
        if !self.is_active() {
            return;
        }
        self.terminate_with_strip().await;
    }

    async fn terminate_with_strip(&mut self) {
        if let Err(failure) = self.surface.strip_controls().await {
            debug!(?failure, "Control strip failed during termination");
        }
        self.state = SessionState::Terminated;
    }
}
