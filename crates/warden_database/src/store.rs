//! The persistent store seam.

use crate::models::{AliasRow, ChannelRow, GuildRow, MemberRow, UserLogRow, VoiceChannelRow};
use crate::DatabaseResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Full contents of the five cacheable record kinds, read in one pass at
/// startup.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    /// All guild rows
    pub guilds: Vec<GuildRow>,
    /// All channel rows
    pub channels: Vec<ChannelRow>,
    /// All membership rows
    pub members: Vec<MemberRow>,
    /// All catalog alias rows
    pub aliases: Vec<AliasRow>,
    /// All voice channel mapping rows
    pub voice_links: Vec<VoiceChannelRow>,
}

/// Operations the Warden core needs from the relational store.
///
/// Every method maps to a point lookup or single-row statement wrapped in
/// its own transaction; no multi-statement transaction spans two tables.
/// The Postgres implementation is [`crate::WardenRepository`]; tests use
/// in-memory fakes.
#[async_trait]
pub trait CommunityStore: Send + Sync {
    /// Read the full current content of the cacheable tables.
    async fn load_snapshot(&self) -> DatabaseResult<StoreSnapshot>;

    /// Insert a guild row.
    async fn insert_guild(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()>;

    /// Point lookup of a guild row.
    async fn fetch_guild(&self, guild_id: i64) -> DatabaseResult<Option<GuildRow>>;

    /// Set the watch-mode flag on an existing guild row.
    async fn update_watch_mode(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()>;

    /// Insert a channel row.
    async fn insert_channel(&self, guild_id: i64, channel_id: i64) -> DatabaseResult<()>;

    /// Insert a membership row.
    async fn insert_member(&self, guild_id: i64, user_id: i64) -> DatabaseResult<()>;

    /// Insert a catalog alias row.
    async fn insert_alias(
        &self,
        guild_id: i64,
        alias: &str,
        department: &str,
    ) -> DatabaseResult<()>;

    /// Insert a voice channel mapping row.
    async fn insert_voice_link(
        &self,
        guild_id: i64,
        voice_id: i64,
        text_id: i64,
        role_id: i64,
    ) -> DatabaseResult<()>;

    /// Append a message log entry.
    async fn insert_log_entry(&self, entry: &UserLogRow) -> DatabaseResult<()>;

    /// All log entries for a user in a guild, newest first.
    async fn user_logs(&self, guild_id: i64, user_id: i64) -> DatabaseResult<Vec<UserLogRow>>;

    /// All log entries for a channel in a guild, newest first.
    async fn channel_logs(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> DatabaseResult<Vec<UserLogRow>>;
}

/// Shared stores satisfy the seam by forwarding through the `Arc`, so a
/// single store handle can be cloned across tasks while the journal owns
/// one clone.
#[async_trait]
impl<T: CommunityStore + ?Sized> CommunityStore for Arc<T> {
    async fn load_snapshot(&self) -> DatabaseResult<StoreSnapshot> {
        (**self).load_snapshot().await
    }

    async fn insert_guild(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        (**self).insert_guild(guild_id, watch_mode).await
    }

    async fn fetch_guild(&self, guild_id: i64) -> DatabaseResult<Option<GuildRow>> {
        (**self).fetch_guild(guild_id).await
    }

    async fn update_watch_mode(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        (**self).update_watch_mode(guild_id, watch_mode).await
    }

    async fn insert_channel(&self, guild_id: i64, channel_id: i64) -> DatabaseResult<()> {
        (**self).insert_channel(guild_id, channel_id).await
    }

    async fn insert_member(&self, guild_id: i64, user_id: i64) -> DatabaseResult<()> {
        (**self).insert_member(guild_id, user_id).await
    }

    async fn insert_alias(
        &self,
        guild_id: i64,
        alias: &str,
        department: &str,
    ) -> DatabaseResult<()> {
        (**self).insert_alias(guild_id, alias, department).await
    }

    async fn insert_voice_link(
        &self,
        guild_id: i64,
        voice_id: i64,
        text_id: i64,
        role_id: i64,
    ) -> DatabaseResult<()> {
        (**self)
            .insert_voice_link(guild_id, voice_id, text_id, role_id)
            .await
    }

    async fn insert_log_entry(&self, entry: &UserLogRow) -> DatabaseResult<()> {
        (**self).insert_log_entry(entry).await
    }

    async fn user_logs(&self, guild_id: i64, user_id: i64) -> DatabaseResult<Vec<UserLogRow>> {
        (**self).user_logs(guild_id, user_id).await
    }

    async fn channel_logs(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> DatabaseResult<Vec<UserLogRow>> {
        (**self).channel_logs(guild_id, channel_id).await
    }
}
