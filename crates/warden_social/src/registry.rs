//! Live session tracking.

use crate::pagination::{MessageSurface, PageSession};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Exactly one live [`PageSession`] per rendered message.
///
/// Actions are keyed by the rendered message's id; a session that
/// terminates through any path is dropped from the registry on the way
/// out.
pub struct SessionRegistry<S: MessageSurface> {
    sessions: Mutex<HashMap<u64, PageSession<S>>>,
}

impl<S: MessageSurface> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: MessageSurface> SessionRegistry<S> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Track a freshly opened session under its message id.
    pub async fn insert(&self, message_id: u64, session: PageSession<S>) {
        self.sessions.lock().await.insert(message_id, session);
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    /// Whether no sessions are live.
    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    /// Route a next-page action to the session for `message_id`.
    pub async fn next(&self, message_id: u64, actor_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&message_id) {
            session.next(actor_id).await;
            if !session.is_active() {
                sessions.remove(&message_id);
            }
        }
    }

    /// Route a previous-page action to the session for `message_id`.
    pub async fn prev(&self, message_id: u64, actor_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&message_id) {
            session.prev(actor_id).await;
            if !session.is_active() {
                sessions.remove(&message_id);
            }
        }
    }

    /// Route a delete action to the session for `message_id`.
    pub async fn delete(&self, message_id: u64, actor_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&message_id) {
            session.delete(actor_id).await;
            if !session.is_active() {
                sessions.remove(&message_id);
            }
        }
    }

    /// Expire the session for `message_id`, if it is still live.
    ///
    /// Safe to call after the session already terminated and was removed;
    /// the expiry is then a no-op.
    pub async fn expire(&self, message_id: u64) {
        let mut sessions = self.sessions.lock().await;
        if let Some(mut session) = sessions.remove(&message_id) {
            debug!(message_id, "Expiring page session");
            session.on_timeout().await;
        }
    }
}

impl<S: MessageSurface + 'static> SessionRegistry<S> {
    /// Arrange for the session to be expired at its deadline.
    ///
    /// The deadline is fixed at session creation, so the timer is armed
    /// once and never rescheduled.
    pub fn schedule_expiry(self: &Arc<Self>, message_id: u64, deadline: std::time::Instant) {
        let registry = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
            registry.expire(message_id).await;
        });
    }
}
