//! PostgreSQL integration for Warden.
//!
//! This crate provides the diesel schema for the six community tables, the
//! row models, the [`CommunityStore`] trait that the rest of the workspace
//! programs against, and the Postgres implementation [`WardenRepository`].
//!
//! # Example
//!
//! ```rust,ignore
//! use warden_database::{establish_connection, CommunityStore, WardenRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = establish_connection()?;
//! let store = WardenRepository::new(conn);
//! let snapshot = store.load_snapshot().await?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod models;
mod repository;
pub mod schema;
mod store;

pub use connection::establish_connection;
pub use models::{AliasRow, ChannelRow, GuildRow, MemberRow, UserLogRow, VoiceChannelRow};
pub use repository::WardenRepository;
pub use store::{CommunityStore, StoreSnapshot};

use warden_error::DatabaseError;

/// Result type for store operations.
pub type DatabaseResult<T> = Result<T, DatabaseError>;
