//! Timestamp normalization.

use chrono::{DateTime, NaiveDateTime, TimeZone};

/// Normalize a timezone-aware timestamp to the naive UTC representation the
/// store expects.
///
/// Gateway events carry fixed-offset timestamps; the `user_logs` table
/// stores `TIMESTAMP` without a zone, so everything is shifted to UTC and
/// the zone dropped before insertion.
///
/// # Examples
///
/// ```
/// use chrono::{FixedOffset, TimeZone};
/// use warden_core::normalize_timestamp;
///
/// let pst = FixedOffset::west_opt(8 * 3600).unwrap();
/// let ts = pst.with_ymd_and_hms(2024, 1, 15, 6, 30, 0).unwrap();
/// let naive = normalize_timestamp(&ts);
/// assert_eq!(naive.to_string(), "2024-01-15 14:30:00");
/// ```
pub fn normalize_timestamp<Tz: TimeZone>(ts: &DateTime<Tz>) -> NaiveDateTime {
    ts.naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn utc_timestamps_keep_their_wall_clock() {
        let ts = Utc.with_ymd_and_hms(2023, 9, 28, 12, 0, 0).unwrap();
        assert_eq!(normalize_timestamp(&ts), ts.naive_utc());
    }

    #[test]
    fn offsets_are_folded_into_utc() {
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        let ts = east.with_ymd_and_hms(2023, 9, 28, 14, 0, 0).unwrap();
        assert_eq!(
            normalize_timestamp(&ts).to_string(),
            "2023-09-28 12:00:00"
        );
    }
}
