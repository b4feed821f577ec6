//! Freshness evaluation for stored entries.
//!
//! Given the store lookup result and the current time, decides whether a
//! cacheable request needs the network at all, and if so whether it should
//! carry a conditional header.

use std::time::{Duration, SystemTime};

use serde_json::Value;

use super::store::Entry;

/// The outcome of evaluating a stored entry against the current time.
#[derive(Debug, Clone, PartialEq)]
pub enum Freshness {
    /// No entry: proceed with an unmodified network request.
    Miss,
    /// The entry is inside its freshness window: serve the payload without
    /// any network call.
    Fresh {
        /// The stored response body to replay.
        payload: Value,
    },
    /// The entry exists but is outside its window: proceed with the network
    /// request, attaching `If-None-Match` with this tag.
    Stale {
        /// The stored entity tag for conditional revalidation.
        etag: String,
    },
}

/// Evaluates a store lookup result at time `now`.
///
/// The freshness window is `[stored_at, stored_at + max_age)`. A zero
/// `max_age` makes the window empty, so every request after the first is
/// conditionally revalidated. A `now` before `stored_at` (clock skew) falls
/// outside the window and is treated as stale. A `max_age` so large the
/// window end is beyond representable time leaves the window open-ended.
pub fn evaluate(entry: Option<Entry>, now: SystemTime) -> Freshness {
    let Some(entry) = entry else {
        return Freshness::Miss;
    };

    let window_end = entry
        .stored_at
        .checked_add(Duration::from_secs(entry.max_age_secs));
    let within_window = now >= entry.stored_at && window_end.is_none_or(|end| now < end);
    if within_window {
        Freshness::Fresh {
            payload: entry.payload,
        }
    } else {
        Freshness::Stale { etag: entry.etag }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(max_age_secs: u64, stored_at: SystemTime) -> Entry {
        Entry {
            etag: "\"abc\"".to_owned(),
            payload: json!({"id": 1}),
            max_age_secs,
            stored_at,
        }
    }

    #[test]
    fn absent_entry_is_a_miss() {
        assert_eq!(evaluate(None, SystemTime::UNIX_EPOCH), Freshness::Miss);
    }

    #[test]
    fn inside_window_is_fresh() {
        let stored_at = SystemTime::UNIX_EPOCH;
        let now = stored_at + Duration::from_secs(29);
        assert_eq!(
            evaluate(Some(entry(30, stored_at)), now),
            Freshness::Fresh {
                payload: json!({"id": 1})
            }
        );
    }

    #[test]
    fn window_start_is_fresh_and_end_is_stale() {
        let stored_at = SystemTime::UNIX_EPOCH;
        assert!(matches!(
            evaluate(Some(entry(30, stored_at)), stored_at),
            Freshness::Fresh { .. }
        ));
        // half-open window: exactly stored_at + max_age is already stale
        assert!(matches!(
            evaluate(Some(entry(30, stored_at)), stored_at + Duration::from_secs(30)),
            Freshness::Stale { .. }
        ));
    }

    #[test]
    fn past_window_is_stale_with_etag() {
        let stored_at = SystemTime::UNIX_EPOCH;
        let now = stored_at + Duration::from_secs(31);
        assert_eq!(
            evaluate(Some(entry(30, stored_at)), now),
            Freshness::Stale {
                etag: "\"abc\"".to_owned()
            }
        );
    }

    #[test]
    fn zero_max_age_is_always_stale() {
        let stored_at = SystemTime::UNIX_EPOCH;
        assert!(matches!(
            evaluate(Some(entry(0, stored_at)), stored_at),
            Freshness::Stale { .. }
        ));
    }

    #[test]
    fn unrepresentable_window_end_is_open_ended() {
        let stored_at = SystemTime::UNIX_EPOCH;
        let now = stored_at + Duration::from_secs(1_000_000);
        assert!(matches!(
            evaluate(Some(entry(u64::MAX, stored_at)), now),
            Freshness::Fresh { .. }
        ));
    }

    #[test]
    fn now_before_stored_at_is_stale() {
        let stored_at = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        assert!(matches!(
            evaluate(Some(entry(30, stored_at)), SystemTime::UNIX_EPOCH),
            Freshness::Stale { .. }
        ));
    }
}
