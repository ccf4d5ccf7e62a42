//! Message log entry read model.

use crate::LogKind;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One recorded message event, as read back from the store.
///
/// Entries are append-only: once written they are never updated or deleted,
/// so this type has no mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Guild the message belonged to
    pub guild_id: i64,
    /// Channel the message was posted in
    pub channel_id: i64,
    /// Author of the message
    pub user_id: i64,
    /// Snowflake id of the message itself
    pub message_id: i64,
    /// Content snapshot at the time of the event
    pub content: String,
    /// What the entry records (original, edit, deletion)
    pub kind: LogKind,
    /// Event timestamp, normalized to naive UTC
    pub logged_at: NaiveDateTime,
}
