//! PostgreSQL repository for community data.

use crate::models::{AliasRow, ChannelRow, GuildRow, MemberRow, UserLogRow, VoiceChannelRow};
use crate::schema::{catalogue_aliases, channels, guild_users, guilds, user_logs, voice_channels};
use crate::store::{CommunityStore, StoreSnapshot};
use crate::DatabaseResult;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;
use warden_error::DatabaseError;

/// PostgreSQL implementation of [`CommunityStore`].
///
/// Each call issues a single statement in its own transaction. Diesel
/// errors are mapped through [`DatabaseError`], which discriminates
/// unique-key violations from other constraint failures so the write
/// coordinator never has to inspect diesel types.
pub struct WardenRepository {
    /// Database connection wrapped in Arc<Mutex> for async safety.
    conn: Arc<Mutex<PgConnection>>,
}

impl WardenRepository {
    /// Create a new repository owning the given connection.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from a shared connection handle.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl CommunityStore for WardenRepository {
    #[instrument(skip(self))]
    async fn load_snapshot(&self) -> DatabaseResult<StoreSnapshot> {
        let mut conn = self.conn.lock().await;

        let guilds: Vec<GuildRow> = guilds::table
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        let channels: Vec<ChannelRow> = channels::table
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        let members: Vec<MemberRow> = guild_users::table
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        let aliases: Vec<AliasRow> = catalogue_aliases::table
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        let voice_links: Vec<VoiceChannelRow> = voice_channels::table
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(StoreSnapshot {
            guilds,
            channels,
            members,
            aliases,
            voice_links,
        })
    }

    #[instrument(skip(self))]
    async fn insert_guild(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(guilds::table)
            .values(GuildRow {
                guild_id,
                watch_mode,
            })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_guild(&self, guild_id: i64) -> DatabaseResult<Option<GuildRow>> {
        let mut conn = self.conn.lock().await;

        guilds::table
            .find(guild_id)
            .first(&mut *conn)
            .optional()
            .map_err(DatabaseError::from)
    }

    #[instrument(skip(self))]
    async fn update_watch_mode(&self, guild_id: i64, watch_mode: bool) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::update(guilds::table.find(guild_id))
            .set(guilds::watch_mode.eq(watch_mode))
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_channel(&self, guild_id: i64, channel_id: i64) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(channels::table)
            .values(ChannelRow {
                channel_id,
                guild_id,
            })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_member(&self, guild_id: i64, user_id: i64) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(guild_users::table)
            .values(MemberRow { user_id, guild_id })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_alias(
        &self,
        guild_id: i64,
        alias: &str,
        department: &str,
    ) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(catalogue_aliases::table)
            .values(AliasRow {
                guild_id,
                department: department.to_string(),
                alias: alias.to_string(),
            })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn insert_voice_link(
        &self,
        guild_id: i64,
        voice_id: i64,
        text_id: i64,
        role_id: i64,
    ) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(voice_channels::table)
            .values(VoiceChannelRow {
                voice_id,
                guild_id,
                text_id,
                role_id,
            })
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self, entry), fields(guild_id = entry.guild_id, message_id = entry.message_id))]
    async fn insert_log_entry(&self, entry: &UserLogRow) -> DatabaseResult<()> {
        let mut conn = self.conn.lock().await;

        diesel::insert_into(user_logs::table)
            .values(entry)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn user_logs(&self, guild_id: i64, user_id: i64) -> DatabaseResult<Vec<UserLogRow>> {
        let mut conn = self.conn.lock().await;

        user_logs::table
            .filter(user_logs::guild_id.eq(guild_id))
            .filter(user_logs::user_id.eq(user_id))
            .order(user_logs::logged_at.desc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    #[instrument(skip(self))]
    async fn channel_logs(
        &self,
        guild_id: i64,
        channel_id: i64,
    ) -> DatabaseResult<Vec<UserLogRow>> {
        let mut conn = self.conn.lock().await;

        user_logs::table
            .filter(user_logs::guild_id.eq(guild_id))
            .filter(user_logs::channel_id.eq(channel_id))
            .order(user_logs::logged_at.desc())
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
