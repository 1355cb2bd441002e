//! Wall-clock time model.
//!
//! Unlike the tick-indexed clock this crate's layout is modeled after, the
//! routing core deals directly in RFC3339 departure times and must report
//! absolute arrival instants back across the facade boundary (§6). All
//! instants are carried internally as UTC to avoid time-zone surprises;
//! conversion to/from RFC3339 text happens only at that boundary.

use chrono::{DateTime, Utc};

/// An absolute point in time, always UTC.
pub type Instant = DateTime<Utc>;

/// Advance `instant` by `secs` seconds (fractional seconds allowed).
///
/// Centralizes the seconds-to-duration conversion so call sites don't each
/// reach for `chrono::Duration` construction differently.
#[inline]
pub fn advance_secs(instant: Instant, secs: f64) -> Instant {
    instant + chrono::Duration::milliseconds((secs * 1000.0).round() as i64)
}

/// Seconds elapsed from `earlier` to `later` (may be negative).
#[inline]
pub fn elapsed_secs(earlier: Instant, later: Instant) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn advance_and_elapsed_round_trip() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t1 = advance_secs(t0, 66.8);
        assert!((elapsed_secs(t0, t1) - 66.8).abs() < 1e-3);
    }
}
