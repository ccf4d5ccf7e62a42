//! Message journal implementation.

use chrono::{DateTime, FixedOffset};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use warden_cache::{GuildStateCache, VoiceLink};
use warden_core::{normalize_timestamp, LogEntry, LogKind};
use warden_database::{CommunityStore, DatabaseResult, UserLogRow};

/// Coordinator for all writes against the community store.
///
/// The journal holds the guild state cache and uses it as its existence
/// oracle: before a message log entry is inserted, any missing parent
/// record (guild, channel, membership) is created first, store write
/// before cache update. Each step runs in its own store transaction; the
/// cascade as a whole is not atomic. A failure after the parent steps
/// leaves the parents durably created (they are idempotent facts) and the
/// log entry missing — the call fails and is not retried here.
///
/// Concurrency: no lock is held across store I/O, so two cascades for the
/// same never-seen guild/channel/user can race between the existence check
/// and the insert. The loser's duplicate-key rejection is treated as
/// "already exists": the cache entry is re-derived and the cascade
/// continues.
pub struct MessageJournal<S> {
    store: S,
    cache: RwLock<GuildStateCache>,
}

impl<S: CommunityStore> MessageJournal<S> {
    /// Load the full guild state from the store and build the journal.
    ///
    /// This is the one place where a store failure aborts startup: the
    /// process cannot begin safely with an unknown state.
    pub async fn load(store: S) -> DatabaseResult<Self> {
        let snapshot = store.load_snapshot().await?;
        let cache = GuildStateCache::from_snapshot(snapshot);
        Ok(Self {
            store,
            cache: RwLock::new(cache),
        })
    }

    /// Build a journal over an already-loaded cache.
    pub fn with_cache(store: S, cache: GuildStateCache) -> Self {
        Self {
            store,
            cache: RwLock::new(cache),
        }
    }

    /// Whether message activity is being logged for this guild.
    pub async fn watching(&self, guild_id: i64) -> bool {
        self.cache.read().await.watch_mode(guild_id).unwrap_or(false)
    }

    /// Whether the guild is known to the cache.
    pub async fn guild_known(&self, guild_id: i64) -> bool {
        self.cache.read().await.guild_known(guild_id)
    }

    /// Resolve a catalog alias registered for this guild.
    pub async fn resolve_alias(&self, guild_id: i64, alias: &str) -> Option<String> {
        self.cache
            .read()
            .await
            .resolve_alias(guild_id, alias)
            .map(str::to_string)
    }

    /// The voice channel mapping registered for this guild, if any.
    pub async fn voice_link(&self, guild_id: i64, voice_id: i64) -> Option<VoiceLink> {
        self.cache.read().await.voice_link(guild_id, voice_id)
    }

    /// Record one message event, creating any missing parent rows first.
    ///
    /// The cascade order is guild, channel, membership, then the entry
    /// itself. A duplicate-key rejection on a parent insert means a
    /// concurrent cascade won the race and is tolerated; any other store
    /// error aborts the call unchanged.
    #[instrument(skip(self, content, timestamp))]
    pub async fn log_message(
        &self,
        guild_id: i64,
        channel_id: i64,
        user_id: i64,
        message_id: i64,
        content: &str,
        kind: LogKind,
        timestamp: DateTime<FixedOffset>,
    ) -> DatabaseResult<()> {
        let logged_at = normalize_timestamp(&timestamp);

        self.ensure_guild(guild_id).await?;
        self.ensure_channel(guild_id, channel_id).await?;
        self.ensure_member(guild_id, user_id).await?;

        let entry = UserLogRow::new(
            guild_id, channel_id, user_id, message_id, content, kind, logged_at,
        );
        self.store.insert_log_entry(&entry).await?;
        debug!(message_id, %kind, "Logged message event");
        Ok(())
    }

    /// Set a guild's watch-mode flag.
    ///
    /// An unknown guild is first created with the requested mode; a guild
    /// created concurrently falls through to a plain update. The cache is
    /// touched only after the store write succeeded.
    #[instrument(skip(self))]
    pub async fn update_watch_mode(&self, guild_id: i64, enabled: bool) -> DatabaseResult<()> {
        let known = self.cache.read().await.guild_known(guild_id);
        if !known {
            match self.store.insert_guild(guild_id, enabled).await {
                Ok(()) => {
                    self.cache.write().await.record_guild(guild_id, enabled);
                    return Ok(());
                }
                Err(e) if e.is_duplicate_key() => {
                    debug!(guild_id, "Guild appeared concurrently, updating instead");
                }
                Err(e) => return Err(e),
            }
        }

        self.store.update_watch_mode(guild_id, enabled).await?;
        self.cache.write().await.set_watch_mode(guild_id, enabled);
        Ok(())
    }

    /// Make sure a guild row exists for an observed guild.
    ///
    /// Used by startup enumeration and join events; new guilds start with
    /// watch mode disabled.
    #[instrument(skip(self))]
    pub async fn track_guild(&self, guild_id: i64) -> DatabaseResult<()> {
        self.ensure_guild(guild_id).await
    }

    /// Register a catalog alias for a guild.
    #[instrument(skip(self))]
    pub async fn register_alias(
        &self,
        guild_id: i64,
        alias: &str,
        department: &str,
    ) -> DatabaseResult<()> {
        self.ensure_guild(guild_id).await?;
        self.store.insert_alias(guild_id, alias, department).await?;
        self.cache
            .write()
            .await
            .record_alias(guild_id, alias.to_string(), department.to_string());
        Ok(())
    }

    /// Register a managed voice channel mapping for a guild.
    #[instrument(skip(self))]
    pub async fn register_voice_link(
        &self,
        guild_id: i64,
        voice_id: i64,
        text_id: i64,
        role_id: i64,
    ) -> DatabaseResult<()> {
        self.ensure_guild(guild_id).await?;
        self.store
            .insert_voice_link(guild_id, voice_id, text_id, role_id)
            .await?;
        self.cache
            .write()
            .await
            .record_voice_link(guild_id, voice_id, VoiceLink { text_id, role_id });
        Ok(())
    }

    /// All log entries for a user in a guild, newest first.
    ///
    /// Read-through: log volume is unbounded and never cached.
    pub async fn user_logs(&self, guild_id: i64, user_id: i64) -> DatabaseResult<Vec<LogEntry>> {
        let rows = self.store.user_logs(guild_id, user_id).await?;
        rows.into_iter().map(LogEntry::try_from).collect()
    }

    /// All log entries for a channel in a guild, newest first.
    pub async fn channel_logs(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> DatabaseResult<Vec<LogEntry>> {
        let rows = self.store.channel_logs(guild_id, channel_id).await?;
        rows.into_iter().map(LogEntry::try_from).collect()
    }

    async fn ensure_guild(&self, guild_id: i64) -> DatabaseResult<()> {
        if self.cache.read().await.guild_known(guild_id) {
            return Ok(());
        }

        match self.store.insert_guild(guild_id, false).await {
            Ok(()) => {
                self.cache.write().await.record_guild(guild_id, false);
                Ok(())
            }
            Err(e) if e.is_duplicate_key() => {
                // Lost the insert race. Re-derive the cache entry from the
                // store row so a watch mode set by the winner is not
                // clobbered with the default.
                warn!(guild_id, "Guild insert raced, re-deriving cache entry");
                let watch_mode = self
                    .store
                    .fetch_guild(guild_id)
                    .await?
                    .map(|g| g.watch_mode)
                    .unwrap_or(false);
                self.cache.write().await.record_guild(guild_id, watch_mode);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn ensure_channel(&self, guild_id: i64, channel_id: i64) -> DatabaseResult<()> {
        if self.cache.read().await.channel_known(guild_id, channel_id) {
            return Ok(());
        }

        match self.store.insert_channel(guild_id, channel_id).await {
            Ok(()) => {
                self.cache.write().await.record_channel(guild_id, channel_id);
                Ok(())
            }
            Err(e) if e.is_duplicate_key() => {
                warn!(guild_id, channel_id, "Channel insert raced, recording as known");
                self.cache.write().await.record_channel(guild_id, channel_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn ensure_member(&self, guild_id: i64, user_id: i64) -> DatabaseResult<()> {
        if self.cache.read().await.member_known(guild_id, user_id) {
            return Ok(());
        }

        match self.store.insert_member(guild_id, user_id).await {
            Ok(()) => {
                self.cache.write().await.record_member(guild_id, user_id);
                Ok(())
            }
            Err(e) if e.is_duplicate_key() => {
                warn!(guild_id, user_id, "Membership insert raced, recording as known");
                self.cache.write().await.record_member(guild_id, user_id);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
