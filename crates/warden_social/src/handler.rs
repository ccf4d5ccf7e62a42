//! Serenity event handler for the Warden bot.

use crate::surface::DiscordSurface;
use crate::{commands, embeds, Journal, SessionRegistry};
use serenity::all::{ChannelId, GuildId, MessageId, Ready};
use serenity::async_trait;
use serenity::client::{Context, EventHandler};
use serenity::model::application::{ComponentInteraction, Interaction};
use serenity::model::channel::Message;
use serenity::model::event::MessageUpdateEvent;
use serenity::model::gateway::GatewayIntents;
use serenity::model::guild::Guild;
use serenity::model::voice::VoiceState;
use serenity::model::Timestamp;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};
use warden_catalog::CatalogClient;
use warden_core::LogKind;

/// Event handler wiring gateway events to the message journal and the
/// interactive command surface.
pub struct WardenHandler {
    pub(crate) journal: Arc<Journal>,
    pub(crate) catalog: Arc<CatalogClient>,
    pub(crate) sessions: Arc<SessionRegistry<DiscordSurface>>,
    pub(crate) page_timeout: Duration,
}

impl WardenHandler {
    /// Create a handler over the shared journal and catalog client.
    pub fn new(journal: Arc<Journal>, catalog: CatalogClient, page_timeout: Duration) -> Self {
        Self {
            journal,
            catalog: Arc::new(catalog),
            sessions: Arc::new(SessionRegistry::new()),
            page_timeout,
        }
    }

    /// Required gateway intents for the bot.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_VOICE_STATES
            | GatewayIntents::MESSAGE_CONTENT
    }

    /// Convert a Discord snowflake (u64) to a store id (i64).
    pub(crate) fn to_db_id(id: u64) -> i64 {
        id as i64
    }

    async fn handle_component(&self, ctx: &Context, component: &ComponentInteraction) {
        let message_id = component.message.id.get();
        let actor_id = component.user.id.get();

        // Acknowledge first so the interaction never shows as failed; the
        // visible update happens through the session's own edit.
        if let Err(e) = component.defer(&ctx.http).await {
            debug!(error = %e, "Failed to acknowledge component interaction");
        }

        match component.data.custom_id.as_str() {
            embeds::PREV_BUTTON => self.sessions.prev(message_id, actor_id).await,
            embeds::NEXT_BUTTON => self.sessions.next(message_id, actor_id).await,
            embeds::DELETE_BUTTON => self.sessions.delete(message_id, actor_id).await,
            other => debug!(custom_id = other, "Ignoring unknown component"),
        }
    }
}

#[async_trait]
impl EventHandler for WardenHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Warden online");

        for guild in &ready.guilds {
            let guild_id = Self::to_db_id(guild.id.get());
            if let Err(e) = self.journal.track_guild(guild_id).await {
                error!(guild_id, error = %e, "Failed to track guild at startup");
            }
            if let Err(e) = guild
                .id
                .set_commands(&ctx.http, commands::definitions())
                .await
            {
                error!(guild_id, error = %e, "Failed to register guild commands");
            }
        }
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        let guild_id = Self::to_db_id(guild.id.get());
        if let Err(e) = self.journal.track_guild(guild_id).await {
            error!(guild_id, error = %e, "Failed to track joined guild");
        }
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(guild_id) = msg.guild_id else {
            return;
        };
        let guild_id = Self::to_db_id(guild_id.get());

        if !self.journal.watching(guild_id).await {
            return;
        }

        if let Err(e) = self
            .journal
            .log_message(
                guild_id,
                Self::to_db_id(msg.channel_id.get()),
                Self::to_db_id(msg.author.id.get()),
                Self::to_db_id(msg.id.get()),
                &msg.content,
                LogKind::Original,
                (*msg.timestamp).fixed_offset(),
            )
            .await
        {
            error!(guild_id, message_id = msg.id.get(), error = %e, "Failed to log message");
        }
    }

    async fn message_update(
        &self,
        _ctx: Context,
        old_if_available: Option<Message>,
        new: Option<Message>,
        event: MessageUpdateEvent,
    ) {
        let Some(guild_id) = event.guild_id else {
            return;
        };
        let guild_id = Self::to_db_id(guild_id.get());

        if !self.journal.watching(guild_id).await {
            return;
        }

        let author = new
            .as_ref()
            .map(|m| m.author.clone())
            .or_else(|| old_if_available.as_ref().map(|m| m.author.clone()))
            .or_else(|| event.author.clone());
        let Some(author) = author else {
            debug!(message_id = event.id.get(), "Edit without a resolvable author");
            return;
        };
        if author.bot {
            return;
        }

        let channel_id = Self::to_db_id(event.channel_id.get());
        let user_id = Self::to_db_id(author.id.get());
        let message_id = Self::to_db_id(event.id.get());
        let edited_at = (*event.edited_timestamp.unwrap_or_else(Timestamp::now)).fixed_offset();

        if let Some(old) = &old_if_available {
            if let Err(e) = self
                .journal
                .log_message(
                    guild_id,
                    channel_id,
                    user_id,
                    message_id,
                    &old.content,
                    LogKind::EditBefore,
                    edited_at,
                )
                .await
            {
                error!(guild_id, message_id, error = %e, "Failed to log pre-edit content");
            }
        }

        let after = new
            .map(|m| m.content)
            .or_else(|| event.content.clone());
        let Some(after) = after else {
            debug!(message_id, "Edit without new content");
            return;
        };
        if let Err(e) = self
            .journal
            .log_message(
                guild_id,
                channel_id,
                user_id,
                message_id,
                &after,
                LogKind::EditAfter,
                edited_at,
            )
            .await
        {
            error!(guild_id, message_id, error = %e, "Failed to log post-edit content");
        }
    }

    async fn message_delete(
        &self,
        ctx: Context,
        channel_id: ChannelId,
        deleted_message_id: MessageId,
        guild_id: Option<GuildId>,
    ) {
        let Some(guild_id) = guild_id else {
            return;
        };
        let guild_id = Self::to_db_id(guild_id.get());

        if !self.journal.watching(guild_id).await {
            return;
        }

        // Pull the content snapshot out of the gateway cache before any
        // await; the cache reference is not held across suspension points.
        let cached = ctx
            .cache
            .message(channel_id, deleted_message_id)
            .map(|m| (m.author.id.get(), m.author.bot, m.content.clone()));

        match cached {
            Some((_, true, _)) => {}
            Some((author_id, false, content)) => {
                if let Err(e) = self
                    .journal
                    .log_message(
                        guild_id,
                        Self::to_db_id(channel_id.get()),
                        Self::to_db_id(author_id),
                        Self::to_db_id(deleted_message_id.get()),
                        &content,
                        LogKind::Deletion,
                        (*Timestamp::now()).fixed_offset(),
                    )
                    .await
                {
                    error!(guild_id, message_id = deleted_message_id.get(), error = %e,
                        "Failed to log deletion");
                }
            }
            None => {
                debug!(
                    message_id = deleted_message_id.get(),
                    "Deleted message was not cached, skipping log entry"
                );
            }
        }
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id.or_else(|| old.as_ref().and_then(|o| o.guild_id))
        else {
            return;
        };
        let store_guild_id = Self::to_db_id(guild_id.get());

        // Grant the paired role on joining a managed voice channel.
        if let Some(channel) = new.channel_id {
            if let Some(link) = self
                .journal
                .voice_link(store_guild_id, Self::to_db_id(channel.get()))
                .await
            {
                if let Err(e) = ctx
                    .http
                    .add_member_role(
                        guild_id,
                        new.user_id,
                        serenity::all::RoleId::new(link.role_id as u64),
                        Some("joined managed voice channel"),
                    )
                    .await
                {
                    error!(guild_id = store_guild_id, error = %e, "Failed to grant voice role");
                }
            }
        }

        // Revoke it when the user leaves or moves elsewhere.
        if let Some(old_state) = &old {
            if let Some(channel) = old_state.channel_id {
                if Some(channel) != new.channel_id {
                    if let Some(link) = self
                        .journal
                        .voice_link(store_guild_id, Self::to_db_id(channel.get()))
                        .await
                    {
                        if let Err(e) = ctx
                            .http
                            .remove_member_role(
                                guild_id,
                                new.user_id,
                                serenity::all::RoleId::new(link.role_id as u64),
                                Some("left managed voice channel"),
                            )
                            .await
                        {
                            error!(guild_id = store_guild_id, error = %e,
                                "Failed to revoke voice role");
                        }
                    }
                }
            }
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::Command(command) => commands::dispatch(self, &ctx, &command).await,
            Interaction::Component(component) => self.handle_component(&ctx, &component).await,
            _ => {}
        }
    }
}
