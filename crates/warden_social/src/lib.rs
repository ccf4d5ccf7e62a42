//! Discord integration for the Warden community logging bot.
//!
//! This crate wires the message journal, the guild state cache, and the
//! course catalog client to a Discord gateway connection using Serenity.
//!
//! # Architecture
//!
//! ## Data layer
//! - **pagination**: the bounded interactive page session, generic over a
//!   [`MessageSurface`] so the state machine never touches the gateway
//! - **registry**: one live session per rendered message, with deadline
//!   expiry
//!
//! ## Integration layer
//! - **handler**: event handler implementing Serenity's EventHandler trait
//! - **surface**: the Serenity-backed [`MessageSurface`] implementation
//! - **error**: Discord-specific error types
//!
//! ## Feature layer
//! - **commands**: slash command definitions and dispatch
//! - **embeds**: embed and log-dump rendering

mod client;
mod commands;
mod embeds;
mod error;
mod handler;
mod pagination;
mod registry;
mod surface;

pub use client::WardenBot;
pub use commands::definitions;
pub use embeds::{course_embed, page_controls, render_log_dump, section_embed};
pub use error::{DiscordError, DiscordErrorKind, DiscordResult};
pub use handler::WardenHandler;
pub use pagination::{MessageSurface, PageSession, RenderFailure};
pub use registry::SessionRegistry;
pub use surface::DiscordSurface;

use warden_database::WardenRepository;

/// The journal specialization used by the live bot.
pub type Journal = warden_journal::MessageJournal<WardenRepository>;
