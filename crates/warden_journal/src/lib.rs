//! Cascading message log writer for Warden.
//!
//! This crate provides [`MessageJournal`], the coordinator that guarantees
//! parent records (guild, channel, membership) exist in the store before a
//! dependent message log entry is written. The journal owns the in-memory
//! guild state cache and is its single writer.

#![warn(missing_docs)]

mod journal;

pub use journal::MessageJournal;
