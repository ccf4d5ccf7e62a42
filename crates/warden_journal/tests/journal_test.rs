//! Tests for the cascading message journal against an in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use warden_cache::GuildStateCache;
use warden_core::LogKind;
use warden_database::{
    AliasRow, ChannelRow, CommunityStore, GuildRow, MemberRow, StoreSnapshot, UserLogRow,
    VoiceChannelRow,
};
use warden_error::{DatabaseError, DatabaseErrorKind};
use warden_journal::MessageJournal;

type DatabaseResult<T> = Result<T, DatabaseError>;

/// In-memory store that records every call and can be scripted to fail.
#[derive(Default)]
struct MockStore {
    guilds: Mutex<HashMap<i64, bool>>,
    channels: Mutex<HashSet<(i64, i64)>>,
    members: Mutex<HashSet<(i64, i64)>>,
    aliases: Mutex<HashMap<(i64, String), String>>,
    voice_links: Mutex<HashMap<(i64, i64), (i64, i64)>>,
    logs: Mutex<Vec<UserLogRow>>,
    calls: Mutex<Vec<String>>,
    /// Operation names that should fail with an Unavailable error.
    unavailable: Mutex<HashSet<&'static str>>,
}

impl MockStore {
    fn seeded_guild(guild_id: i64, watch_mode: bool) -> Self {
        let store = Self::default();
        store.guilds.lock().unwrap().insert(guild_id, watch_mode);
        store
    }

    fn make_unavailable(&self, op: &'static str) {
        self.unavailable.lock().unwrap().insert(op);
    }

    fn restore(&self, op: &'static str) {
        self.unavailable.lock().unwrap().remove(op);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Record the call, yield to force interleaving at the suspension
    /// point, and fail if the operation is scripted as unavailable.
    async fn enter(&self, op: &'static str) -> DatabaseResult<()> {
        self.calls.lock().unwrap().push(op.to_string());
        tokio::task::yield_now().await;
        if self.unavailable.lock().unwrap().contains(op) {
            return Err(DatabaseError::new(DatabaseErrorKind::Unavailable(
                "connection refused".to_string(),
            )));
        }
        Ok(())
    }
}

fn duplicate(detail: &str) -> DatabaseError {
    DatabaseError::new(DatabaseErrorKind::DuplicateKey(detail.to_string()))
}

#[async_trait]
impl CommunityStore for MockStore {
    async fn load_snapshot(&self) -> DatabaseResult<StoreSnapshot> {
        self.enter("load_snapshot").await?;
        let guilds = self
            .guilds
            .lock()
            .unwrap()
            .iter()
            .map(|(&guild_id, &watch_mode)| GuildRow {
                guild_id,
                watch_mode,
            })
            .collect();
        let channels = self
            .channels
            .lock()
            .unwrap()
            .iter()
            .map(|&(guild_id, channel_id)| ChannelRow {
                channel_id,
                guild_id,
            })
            .collect();
        let members = self
            .members
            .lock()
            .unwrap()
            .iter()
            .map(|&(guild_id, user_id)| MemberRow { user_id, guild_id })
            .collect();
        let aliases = self
            .aliases
            .lock()
            .unwrap()
            .iter()
            .map(|((guild_id, alias), department)| AliasRow {
                guild_id: *guild_id,
                department: department.clone(),
                alias: alias.clone(),
            })
            .collect();
        let voice_links = self
            .voice_links
            .lock()
            .unwrap()
            .iter()
            .map(|(&(guild_id, voice_id), &(text_id, role_id))| VoiceChannelRow {
                voice_id,
                guild_id,
                text_id,
                role_id,
            })
            .collect();
        Ok(StoreSnapshot {
            guilds,
            channels,
            members,
            aliases,
            voice_links,
        })
    }

    async fn insert_guild(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        self.enter("insert_guild").await?;
        let mut guilds = self.guilds.lock().unwrap();
        if guilds.contains_key(&guild_id) {
            return Err(duplicate("guilds_pkey"));
        }
        guilds.insert(guild_id, watch_mode);
        Ok(())
    }

    async fn fetch_guild(&self, guild_id: i64) -> DatabaseResult<Option<GuildRow>> {
        self.enter("fetch_guild").await?;
        Ok(self
            .guilds
            .lock()
            .unwrap()
            .get(&guild_id)
            .map(|&watch_mode| GuildRow {
                guild_id,
                watch_mode,
            }))
    }

    async fn update_watch_mode(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        self.enter("update_watch_mode").await?;
        self.guilds.lock().unwrap().insert(guild_id, watch_mode);
        Ok(())
    }

    async fn insert_channel(&self, guild_id: i64, channel_id: i64) -> DatabaseResult<()> {
        self.enter("insert_channel").await?;
        if !self.channels.lock().unwrap().insert((guild_id, channel_id)) {
            return Err(duplicate("channels_pkey"));
        }
        Ok(())
    }

    async fn insert_member(&self, guild_id: i64, user_id: i64) -> DatabaseResult<()> {
        self.enter("insert_member").await?;
        if !self.members.lock().unwrap().insert((guild_id, user_id)) {
            return Err(duplicate("guild_users_pkey"));
        }
        Ok(())
    }

    async fn insert_alias(
        &self,
        guild_id: i64,
        alias: &str,
        department: &str,
    ) -> DatabaseResult<()> {
        self.enter("insert_alias").await?;
        self.aliases
            .lock()
            .unwrap()
            .insert((guild_id, alias.to_string()), department.to_string());
        Ok(())
    }

    async fn insert_voice_link(
        &self,
        guild_id: i64,
        voice_id: i64,
        text_id: i64,
        role_id: i64,
    ) -> DatabaseResult<()> {
        self.enter("insert_voice_link").await?;
        self.voice_links
            .lock()
            .unwrap()
            .insert((guild_id, voice_id), (text_id, role_id));
        Ok(())
    }

    async fn insert_log_entry(&self, entry: &UserLogRow) -> DatabaseResult<()> {
        self.enter("insert_log_entry").await?;
        let mut logs = self.logs.lock().unwrap();
        if logs
            .iter()
            .any(|e| e.message_id == entry.message_id && e.kind == entry.kind)
        {
            return Err(duplicate("user_logs_pkey"));
        }
        logs.push(entry.clone());
        Ok(())
    }

    async fn user_logs(&self, guild_id: i64, user_id: i64) -> DatabaseResult<Vec<UserLogRow>> {
        self.enter("user_logs").await?;
        let mut rows: Vec<UserLogRow> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.guild_id == guild_id && e.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(rows)
    }

    async fn channel_logs(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> DatabaseResult<Vec<UserLogRow>> {
        self.enter("channel_logs").await?;
        let mut rows: Vec<UserLogRow> = self
            .logs
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.guild_id == guild_id && e.channel_id == channel_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.logged_at.cmp(&a.logged_at));
        Ok(rows)
    }
}

fn stamp(secs: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, secs)
        .unwrap()
        .fixed_offset()
}

fn fresh_journal(store: Arc<MockStore>) -> MessageJournal<Arc<MockStore>> {
    MessageJournal::with_cache(store, GuildStateCache::default())
}

#[tokio::test]
async fn cascade_creates_each_parent_exactly_once() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap();

    assert_eq!(store.guilds.lock().unwrap().get(&1), Some(&false));
    assert_eq!(store.channels.lock().unwrap().len(), 1);
    assert_eq!(store.members.lock().unwrap().len(), 1);
    assert_eq!(store.logs.lock().unwrap().len(), 1);

    let calls_before = store.calls().len();
    journal
        .log_message(1, 2, 3, 43, "hi", LogKind::Original, stamp(1))
        .await
        .unwrap();

    // The second call touches no parent rows.
    assert_eq!(&store.calls()[calls_before..], ["insert_log_entry"]);
    assert_eq!(store.guilds.lock().unwrap().len(), 1);
    assert_eq!(store.channels.lock().unwrap().len(), 1);
    assert_eq!(store.members.lock().unwrap().len(), 1);
    assert_eq!(store.logs.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn concurrent_cascades_for_unseen_tuple_both_succeed() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    let (a, b) = tokio::join!(
        journal.log_message(1, 2, 3, 42, "first", LogKind::Original, stamp(0)),
        journal.log_message(1, 2, 3, 43, "second", LogKind::Original, stamp(1)),
    );
    a.unwrap();
    b.unwrap();

    // The losing cascade's duplicate-key rejections are absorbed: the
    // store ends up with exactly one row per parent and both entries.
    assert_eq!(store.guilds.lock().unwrap().len(), 1);
    assert_eq!(store.channels.lock().unwrap().len(), 1);
    assert_eq!(store.members.lock().unwrap().len(), 1);
    assert_eq!(store.logs.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn lost_guild_race_rederives_watch_mode_from_store() {
    // The guild row exists in the store (watch mode on) but not in this
    // journal's cache, as if a concurrent cascade created it between the
    // existence check and the insert.
    let store = Arc::new(MockStore::seeded_guild(1, true));
    let journal = fresh_journal(store.clone());

    journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap();

    // The cache entry was re-derived, not reset to the default.
    assert!(journal.watching(1).await);
    assert!(store.calls().contains(&"fetch_guild".to_string()));
}

#[tokio::test]
async fn store_failure_aborts_cascade_without_cache_mutation() {
    let store = Arc::new(MockStore::default());
    store.make_unavailable("insert_channel");
    let journal = fresh_journal(store.clone());

    let err = journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, DatabaseErrorKind::Unavailable(_)));

    // The guild step completed and stays; the failed step was attempted
    // exactly once (no internal retry) and nothing after it ran.
    assert_eq!(store.calls(), ["insert_guild", "insert_channel"]);
    assert!(journal.guild_known(1).await);
    assert!(store.channels.lock().unwrap().is_empty());
    assert!(store.logs.lock().unwrap().is_empty());

    // A later call picks up where the store left off, touching only the
    // still-missing rows.
    store.restore("insert_channel");
    let calls_before = store.calls().len();
    journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap();
    assert_eq!(
        &store.calls()[calls_before..],
        ["insert_channel", "insert_member", "insert_log_entry"]
    );
}

#[tokio::test]
async fn guild_unknown_until_store_write_completes() {
    let store = Arc::new(MockStore::default());
    store.make_unavailable("insert_guild");
    let journal = fresh_journal(store.clone());

    let err = journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap_err();
    assert!(matches!(err.kind, DatabaseErrorKind::Unavailable(_)));

    // The cache never claimed existence ahead of the store.
    assert!(!journal.guild_known(1).await);
}

#[tokio::test]
async fn duplicate_log_entry_is_surfaced_not_swallowed() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap();
    let err = journal
        .log_message(1, 2, 3, 42, "hello again", LogKind::Original, stamp(0))
        .await
        .unwrap_err();

    assert!(err.is_duplicate_key());
    assert_eq!(store.logs.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_watch_mode_creates_unknown_guild_with_requested_mode() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    journal.update_watch_mode(1, true).await.unwrap();

    assert_eq!(store.guilds.lock().unwrap().get(&1), Some(&true));
    assert_eq!(store.calls(), ["insert_guild"]);
    assert!(journal.watching(1).await);

    journal.update_watch_mode(1, false).await.unwrap();
    assert_eq!(store.guilds.lock().unwrap().get(&1), Some(&false));
    assert!(store.calls().contains(&"update_watch_mode".to_string()));
    assert!(!journal.watching(1).await);
}

#[tokio::test]
async fn update_watch_mode_falls_through_to_update_on_race() {
    let store = Arc::new(MockStore::seeded_guild(1, false));
    let journal = fresh_journal(store.clone());

    journal.update_watch_mode(1, true).await.unwrap();

    assert_eq!(store.guilds.lock().unwrap().get(&1), Some(&true));
    assert!(journal.watching(1).await);
    assert_eq!(
        store.calls(),
        ["insert_guild", "update_watch_mode"],
        "duplicate insert falls through to a plain update"
    );
}

#[tokio::test]
async fn load_failure_propagates() {
    let store = Arc::new(MockStore::default());
    store.make_unavailable("load_snapshot");

    let err = MessageJournal::load(store).await.err().unwrap();
    assert!(matches!(err.kind, DatabaseErrorKind::Unavailable(_)));
}

#[tokio::test]
async fn load_projects_store_contents() {
    let store = Arc::new(MockStore::seeded_guild(1, true));
    store.channels.lock().unwrap().insert((1, 2));
    store.members.lock().unwrap().insert((1, 3));

    let journal = MessageJournal::load(store.clone()).await.unwrap();

    assert!(journal.watching(1).await);
    let calls_before = store.calls().len();
    journal
        .log_message(1, 2, 3, 42, "hello", LogKind::Original, stamp(0))
        .await
        .unwrap();
    // Every parent was already cached from the snapshot.
    assert_eq!(&store.calls()[calls_before..], ["insert_log_entry"]);
}

#[tokio::test]
async fn log_getters_read_through_newest_first() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    journal
        .log_message(1, 2, 3, 42, "older", LogKind::Original, stamp(0))
        .await
        .unwrap();
    journal
        .log_message(1, 2, 3, 43, "newer", LogKind::Original, stamp(5))
        .await
        .unwrap();

    let by_user = journal.user_logs(1, 3).await.unwrap();
    assert_eq!(by_user.len(), 2);
    assert_eq!(by_user[0].content, "newer");
    assert_eq!(by_user[1].content, "older");
    assert_eq!(by_user[0].kind, LogKind::Original);

    let by_channel = journal.channel_logs(1, 2).await.unwrap();
    assert_eq!(by_channel.len(), 2);
    assert_eq!(by_channel[0].message_id, 43);
}

#[tokio::test]
async fn alias_and_voice_registration_update_store_then_cache() {
    let store = Arc::new(MockStore::default());
    let journal = fresh_journal(store.clone());

    journal.register_alias(1, "ics", "I&C SCI").await.unwrap();
    assert_eq!(
        journal.resolve_alias(1, "ics").await.as_deref(),
        Some("I&C SCI")
    );
    assert!(store
        .aliases
        .lock()
        .unwrap()
        .contains_key(&(1, "ics".to_string())));

    journal.register_voice_link(1, 10, 11, 12).await.unwrap();
    let link = journal.voice_link(1, 10).await.unwrap();
    assert_eq!(link.text_id, 11);
    assert_eq!(link.role_id, 12);
}
