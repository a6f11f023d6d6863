//! Canonical timestamps for audit columns.

use chrono::{NaiveDateTime, Timelike, Utc};

pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current UTC time truncated to whole seconds, matching the canonical
/// `YYYY-MM-DD HH:MM:SS` column format.
pub fn now() -> NaiveDateTime {
    let t = Utc::now().naive_utc();
    t.with_nanosecond(0).unwrap_or(t)
}

pub fn stamp(t: NaiveDateTime) -> String {
    t.format(STAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_round_trips_through_canonical_format() {
        let t = now();
        let parsed = NaiveDateTime::parse_from_str(&stamp(t), STAMP_FORMAT).unwrap();
        assert_eq!(parsed, t);
    }
}
