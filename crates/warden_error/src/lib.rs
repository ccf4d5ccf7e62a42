//! Error types for the Warden community logging bot.
//!
//! This crate provides the foundation error types used throughout the Warden
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern for clean error
//! handling:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use warden_error::{WardenResult, ConfigError};
//!
//! fn load_token() -> WardenResult<String> {
//!     Err(ConfigError::new("DISCORD_TOKEN not set"))?
//! }
//!
//! match load_token() {
//!     Ok(token) => println!("Got token of length {}", token.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod config;
#[cfg(feature = "database")]
mod database;
mod error;
mod pagination;

pub use catalog::{CatalogError, CatalogErrorKind};
pub use config::ConfigError;
#[cfg(feature = "database")]
pub use database::{DatabaseError, DatabaseErrorKind};
pub use error::{WardenError, WardenErrorKind, WardenResult};
pub use pagination::{PaginationError, PaginationErrorKind};
