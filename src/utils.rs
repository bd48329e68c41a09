// src/utils.rs
// Timestamp utilities shared across the hypothesis layer

use chrono::{DateTime, NaiveDateTime, Utc};

// ============================================================================
// Timestamp utilities
// ============================================================================

/// Current time as fractional epoch seconds
pub fn now_epoch() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Current time as an ISO-8601 (RFC 3339) string
pub fn iso_now() -> String {
    Utc::now().to_rfc3339()
}

/// Parse an ISO-8601 timestamp into fractional epoch seconds.
///
/// Accepts both offset-carrying (RFC 3339) and naive timestamps, since the
/// interactive tool emits either depending on its host platform. Returns
/// `None` when the text does not parse; callers fall back to "now".
pub fn parse_iso_timestamp(text: &str) -> Option<f64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_micros() as f64 / 1_000_000.0);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc().timestamp_micros() as f64 / 1_000_000.0);
    }
    None
}

/// Render fractional epoch seconds as an ISO-8601 string.
/// Out-of-range values collapse to the epoch rather than failing.
pub fn epoch_to_iso(epoch: f64) -> String {
    let micros = (epoch * 1_000_000.0) as i64;
    DateTime::<Utc>::from_timestamp_micros(micros)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_timestamp_roundtrip() {
        let epoch = 1_700_000_000.5;
        let iso = epoch_to_iso(epoch);
        let parsed = parse_iso_timestamp(&iso).unwrap();
        assert!((parsed - epoch).abs() < 1e-3);
    }

    #[test]
    fn naive_timestamp_parses() {
        assert!(parse_iso_timestamp("2024-03-01T12:30:00").is_some());
        assert!(parse_iso_timestamp("not a timestamp").is_none());
    }
}
