//! Typed course catalog API client for Warden.
//!
//! The catalog exposes a schedule-of-classes search and a per-course
//! detail endpoint. Responses are decoded into explicit record types — a
//! [`Course`] owns its [`Section`]s by composition — and decoding fails
//! closed when required fields are missing rather than accepting arbitrary
//! shapes.

#![warn(missing_docs)]

mod client;
mod query;
mod records;

pub use client::{CatalogClient, CatalogResult};
pub use query::{SocQuery, SocQueryBuilder, SocQueryBuilderError};
pub use records::{Course, CourseDetail, Enrollment, Meeting, Section};
