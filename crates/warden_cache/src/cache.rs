//! Guild state cache implementation.

use std::collections::{HashMap, HashSet};
use warden_database::StoreSnapshot;

/// A managed voice channel's paired text channel and role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceLink {
    /// The text channel paired with the voice channel
    pub text_id: i64,
    /// The role granted to users in the voice channel
    pub role_id: i64,
}

/// Cached state for a single guild.
#[derive(Debug, Clone, Default)]
struct GuildState {
    watch_mode: bool,
    channels: HashSet<i64>,
    members: HashSet<i64>,
    aliases: HashMap<String, String>,
    voice_links: HashMap<i64, VoiceLink>,
}

/// In-memory projection of the cacheable store tables, keyed by guild id.
///
/// Lookups are O(1) against the snapshot and never touch the store. There
/// is no eviction: the cache holds the full working set for the process
/// lifetime.
///
/// Single-writer rule: only the message journal mutates this cache, and
/// only immediately after the corresponding store write succeeded — never
/// before (the cache must not claim existence of something the store
/// rejected) and never skipped (the cache must not fall permanently
/// behind). Every other component reads.
#[derive(Debug, Default)]
pub struct GuildStateCache {
    guilds: HashMap<i64, GuildState>,
}

impl GuildStateCache {
    /// Build the projection from a full store snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let mut guilds: HashMap<i64, GuildState> = HashMap::new();

        for guild in snapshot.guilds {
            guilds.entry(guild.guild_id).or_default().watch_mode = guild.watch_mode;
        }
        for channel in snapshot.channels {
            guilds
                .entry(channel.guild_id)
                .or_default()
                .channels
                .insert(channel.channel_id);
        }
        for member in snapshot.members {
            guilds
                .entry(member.guild_id)
                .or_default()
                .members
                .insert(member.user_id);
        }
        for alias in snapshot.aliases {
            guilds
                .entry(alias.guild_id)
                .or_default()
                .aliases
                .insert(alias.alias, alias.department);
        }
        for link in snapshot.voice_links {
            guilds.entry(link.guild_id).or_default().voice_links.insert(
                link.voice_id,
                VoiceLink {
                    text_id: link.text_id,
                    role_id: link.role_id,
                },
            );
        }

        tracing::info!(guilds = guilds.len(), "Loaded guild state cache");
        Self { guilds }
    }

    /// Whether a guild row exists.
    pub fn guild_known(&self, guild_id: i64) -> bool {
        self.guilds.contains_key(&guild_id)
    }

    /// The guild's watch-mode flag, if the guild is known.
    pub fn watch_mode(&self, guild_id: i64) -> Option<bool> {
        self.guilds.get(&guild_id).map(|g| g.watch_mode)
    }

    /// Whether a channel row exists under the guild.
    pub fn channel_known(&self, guild_id: i64, channel_id: i64) -> bool {
        self.guilds
            .get(&guild_id)
            .is_some_and(|g| g.channels.contains(&channel_id))
    }

    /// Whether a membership row exists under the guild.
    pub fn member_known(&self, guild_id: i64, user_id: i64) -> bool {
        self.guilds
            .get(&guild_id)
            .is_some_and(|g| g.members.contains(&user_id))
    }

    /// Resolve a catalog alias to its department, if registered.
    pub fn resolve_alias(&self, guild_id: i64, alias: &str) -> Option<&str> {
        self.guilds
            .get(&guild_id)
            .and_then(|g| g.aliases.get(alias))
            .map(String::as_str)
    }

    /// The voice channel mapping, if registered.
    pub fn voice_link(&self, guild_id: i64, voice_id: i64) -> Option<VoiceLink> {
        self.guilds
            .get(&guild_id)
            .and_then(|g| g.voice_links.get(&voice_id))
            .copied()
    }

    /// Record a guild created in the store.
    pub fn record_guild(&mut self, guild_id: i64, watch_mode: bool) {
        tracing::debug!(guild_id, watch_mode, "Recording guild in cache");
        self.guilds.entry(guild_id).or_default().watch_mode = watch_mode;
    }

    /// Update the watch-mode flag for a guild already in the store.
    pub fn set_watch_mode(&mut self, guild_id: i64, enabled: bool) {
        tracing::debug!(guild_id, enabled, "Updating cached watch mode");
        self.guilds.entry(guild_id).or_default().watch_mode = enabled;
    }

    /// Record a channel created in the store.
    pub fn record_channel(&mut self, guild_id: i64, channel_id: i64) {
        tracing::debug!(guild_id, channel_id, "Recording channel in cache");
        self.guilds
            .entry(guild_id)
            .or_default()
            .channels
            .insert(channel_id);
    }

    /// Record a membership created in the store.
    pub fn record_member(&mut self, guild_id: i64, user_id: i64) {
        tracing::debug!(guild_id, user_id, "Recording member in cache");
        self.guilds
            .entry(guild_id)
            .or_default()
            .members
            .insert(user_id);
    }

    /// Record a catalog alias created in the store.
    pub fn record_alias(&mut self, guild_id: i64, alias: String, department: String) {
        tracing::debug!(guild_id, %alias, "Recording catalog alias in cache");
        self.guilds
            .entry(guild_id)
            .or_default()
            .aliases
            .insert(alias, department);
    }

    /// Record a voice channel mapping created in the store.
    pub fn record_voice_link(&mut self, guild_id: i64, voice_id: i64, link: VoiceLink) {
        tracing::debug!(guild_id, voice_id, "Recording voice link in cache");
        self.guilds
            .entry(guild_id)
            .or_default()
            .voice_links
            .insert(voice_id, link);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_database::{AliasRow, ChannelRow, GuildRow, MemberRow, VoiceChannelRow};

    fn snapshot() -> StoreSnapshot {
        StoreSnapshot {
            guilds: vec![
                GuildRow {
                    guild_id: 10,
                    watch_mode: true,
                },
                GuildRow {
                    guild_id: 20,
                    watch_mode: false,
                },
            ],
            channels: vec![ChannelRow {
                channel_id: 100,
                guild_id: 10,
            }],
            members: vec![MemberRow {
                user_id: 7,
                guild_id: 10,
            }],
            aliases: vec![AliasRow {
                guild_id: 10,
                department: "I&C SCI".to_string(),
                alias: "ics".to_string(),
            }],
            voice_links: vec![VoiceChannelRow {
                voice_id: 500,
                guild_id: 20,
                text_id: 501,
                role_id: 502,
            }],
        }
    }

    #[test]
    fn snapshot_projects_all_record_kinds() {
        let cache = GuildStateCache::from_snapshot(snapshot());

        assert!(cache.guild_known(10));
        assert_eq!(cache.watch_mode(10), Some(true));
        assert_eq!(cache.watch_mode(20), Some(false));
        assert!(cache.channel_known(10, 100));
        assert!(cache.member_known(10, 7));
        assert_eq!(cache.resolve_alias(10, "ics"), Some("I&C SCI"));
        assert_eq!(
            cache.voice_link(20, 500),
            Some(VoiceLink {
                text_id: 501,
                role_id: 502,
            })
        );
    }

    #[test]
    fn lookups_miss_for_unknown_keys() {
        let cache = GuildStateCache::from_snapshot(snapshot());

        assert!(!cache.guild_known(30));
        assert_eq!(cache.watch_mode(30), None);
        assert!(!cache.channel_known(10, 999));
        assert!(!cache.channel_known(20, 100));
        assert!(!cache.member_known(20, 7));
        assert_eq!(cache.resolve_alias(20, "ics"), None);
        assert_eq!(cache.voice_link(10, 500), None);
    }

    #[test]
    fn record_makes_keys_visible() {
        let mut cache = GuildStateCache::from_snapshot(StoreSnapshot::default());

        cache.record_guild(1, false);
        cache.record_channel(1, 2);
        cache.record_member(1, 3);
        cache.record_alias(1, "cs".to_string(), "COMPSCI".to_string());
        cache.record_voice_link(
            1,
            4,
            VoiceLink {
                text_id: 5,
                role_id: 6,
            },
        );

        assert!(cache.guild_known(1));
        assert_eq!(cache.watch_mode(1), Some(false));
        assert!(cache.channel_known(1, 2));
        assert!(cache.member_known(1, 3));
        assert_eq!(cache.resolve_alias(1, "cs"), Some("COMPSCI"));
        assert!(cache.voice_link(1, 4).is_some());
    }

    #[test]
    fn set_watch_mode_flips_the_flag_in_place() {
        let mut cache = GuildStateCache::from_snapshot(snapshot());

        cache.set_watch_mode(20, true);
        assert_eq!(cache.watch_mode(20), Some(true));

        // channels recorded earlier are untouched
        assert!(cache.channel_known(10, 100));
    }
}
