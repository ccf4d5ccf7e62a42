//! Message log entry kinds.

use serde::{Deserialize, Serialize};

/// The kind of event a message log entry records.
///
/// The store encodes kinds as short text labels; `Display` and `FromStr`
/// round-trip that encoding.
///
/// # Examples
///
/// ```
/// use warden_core::LogKind;
/// use std::str::FromStr;
///
/// assert_eq!(format!("{}", LogKind::EditBefore), "Edit: before");
/// assert_eq!(LogKind::from_str("Deletion").unwrap(), LogKind::Deletion);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum LogKind {
    /// A newly created message
    #[strum(serialize = "Original")]
    Original,
    /// The previous content of an edited message
    #[strum(serialize = "Edit: before")]
    EditBefore,
    /// The new content of an edited message
    #[strum(serialize = "Edit: after")]
    EditAfter,
    /// A deleted message
    #[strum(serialize = "Deletion")]
    Deletion,
}
