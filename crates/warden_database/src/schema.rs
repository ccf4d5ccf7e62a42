//! Diesel table definitions for the community tables.

diesel::table! {
    guilds (guild_id) {
        guild_id -> Int8,
        watch_mode -> Bool,
    }
}

diesel::table! {
    channels (channel_id, guild_id) {
        channel_id -> Int8,
        guild_id -> Int8,
    }
}

diesel::table! {
    guild_users (user_id, guild_id) {
        user_id -> Int8,
        guild_id -> Int8,
    }
}

diesel::table! {
    catalogue_aliases (guild_id, alias) {
        guild_id -> Int8,
        department -> Text,
        alias -> Text,
    }
}

diesel::table! {
    voice_channels (voice_id, guild_id) {
        voice_id -> Int8,
        guild_id -> Int8,
        text_id -> Int8,
        role_id -> Int8,
    }
}

diesel::table! {
    user_logs (message_id, kind, logged_at) {
        user_id -> Int8,
        channel_id -> Int8,
        guild_id -> Int8,
        message_id -> Int8,
        content -> Text,
        kind -> Text,
        logged_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    guilds,
    channels,
    guild_users,
    catalogue_aliases,
    voice_channels,
    user_logs,
);
