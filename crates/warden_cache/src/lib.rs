//! In-memory guild state projection for Warden.
//!
//! This crate holds the process-wide mirror of the cacheable store tables:
//! guilds and their watch-mode flags, known channels, observed memberships,
//! catalog aliases, and voice channel mappings. The projection is loaded
//! once at startup and thereafter mutated only by the message journal.

#![warn(missing_docs)]

mod cache;

pub use cache::{GuildStateCache, VoiceLink};
