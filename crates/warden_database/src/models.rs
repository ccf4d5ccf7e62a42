//! Row models for the community tables.
//!
//! The tables here have no generated columns, so each struct derives both
//! `Queryable` and `Insertable` and is used in both directions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use std::str::FromStr;
use warden_core::{LogEntry, LogKind};
use warden_error::{DatabaseError, DatabaseErrorKind};

/// Row of the `guilds` table: one community and its watch-mode flag.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::guilds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GuildRow {
    pub guild_id: i64,
    pub watch_mode: bool,
}

/// Row of the `channels` table. Existence only, no payload.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::channels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChannelRow {
    pub channel_id: i64,
    pub guild_id: i64,
}

/// Row of the `guild_users` table: a user observed in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::guild_users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MemberRow {
    pub user_id: i64,
    pub guild_id: i64,
}

/// Row of the `catalogue_aliases` table: per-guild department alias.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::catalogue_aliases)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AliasRow {
    pub guild_id: i64,
    pub department: String,
    pub alias: String,
}

/// Row of the `voice_channels` table: a managed voice channel and its
/// paired text channel and role.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::voice_channels)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VoiceChannelRow {
    pub voice_id: i64,
    pub guild_id: i64,
    pub text_id: i64,
    pub role_id: i64,
}

/// Row of the `user_logs` table: one append-only message event.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::user_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserLogRow {
    pub user_id: i64,
    pub channel_id: i64,
    pub guild_id: i64,
    pub message_id: i64,
    pub content: String,
    pub kind: String,
    pub logged_at: NaiveDateTime,
}

impl UserLogRow {
    /// Build an insertable log row from domain values.
    pub fn new(
        guild_id: i64,
        channel_id: i64,
        user_id: i64,
        message_id: i64,
        content: impl Into<String>,
        kind: LogKind,
        logged_at: NaiveDateTime,
    ) -> Self {
        Self {
            user_id,
            channel_id,
            guild_id,
            message_id,
            content: content.into(),
            kind: kind.to_string(),
            logged_at,
        }
    }
}

impl TryFrom<UserLogRow> for LogEntry {
    type Error = DatabaseError;

    fn try_from(row: UserLogRow) -> Result<Self, Self::Error> {
        let kind = LogKind::from_str(&row.kind).map_err(|_| {
            DatabaseError::new(DatabaseErrorKind::Serialization(format!(
                "unknown log kind label: {}",
                row.kind
            )))
        })?;
        Ok(LogEntry {
            guild_id: row.guild_id,
            channel_id: row.channel_id,
            user_id: row.user_id,
            message_id: row.message_id,
            content: row.content,
            kind,
            logged_at: row.logged_at,
        })
    }
}
