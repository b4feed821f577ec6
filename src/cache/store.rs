//! In-process TTL store for cached response records.
//!
//! The store owns every [`Entry`] exclusively; interceptors fetch a clone by
//! key for the duration of one request/response cycle and never hold
//! references across calls. Expired entries are evicted on access.
//!
//! Retention is separate from freshness: an entry's retention TTL governs
//! how long it stays in memory (so it can still serve conditional
//! revalidation after its freshness window closes), while the freshness
//! window in [`crate::cache::freshness`] governs whether a network call is
//! needed at all.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// How long an entry keeps serving conditional revalidation after its
/// freshness window closes: 15 minutes. Entries with no freshness window
/// (`max-age` 0 or absent) are retained for exactly this long.
pub const REVALIDATION_RETENTION_SECS: u64 = 900;

/// A time source. Injected into the store so time-based tests are
/// deterministic.
pub trait Clock: Send + Sync {
    /// Returns the current wall-clock time.
    fn now(&self) -> SystemTime;
}

/// The real wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// One cached response record.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Entity tag returned by the origin, or the `"no-etag"` sentinel.
    pub etag: String,
    /// Decoded response body to be replayed.
    pub payload: serde_json::Value,
    /// Freshness window length in seconds; `0` means always revalidate.
    pub max_age_secs: u64,
    /// Wall-clock time the entry was written.
    pub stored_at: SystemTime,
}

struct Slot {
    entry: Entry,
    /// Retention deadline; unrelated to the freshness window. `None` when
    /// the deadline is beyond representable time (absurdly large
    /// `max-age`), meaning the entry is retained until replaced or reset.
    expires_at: Option<SystemTime>,
}

/// Key/value store of cached response records with per-entry retention TTLs.
///
/// Explicitly constructed and shared by reference (`Arc`); there is no
/// process-wide singleton. Reads and writes are atomic per key: a completed
/// [`set`](Self::set) for a key is observed by every subsequent
/// [`get`](Self::get) for that key.
pub struct EntryStore {
    clock: Box<dyn Clock>,
    slots: Mutex<HashMap<String, Slot>>,
}

impl EntryStore {
    /// Creates a store backed by the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates a store with an injected time source.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the store's current time.
    pub fn now(&self) -> SystemTime {
        self.clock.now()
    }

    /// Returns the entry for `key`, or `None` if absent or past retention.
    ///
    /// Eviction happens here, on access: an entry whose retention TTL has
    /// elapsed is removed and reported absent.
    pub fn get(&self, key: &str) -> Option<Entry> {
        let now = self.clock.now();
        let mut slots = self.slots.lock().ok()?;
        match slots.get(key) {
            Some(slot) if slot.expires_at.is_none_or(|at| at > now) => {
                Some(slot.entry.clone())
            }
            Some(_) => {
                slots.remove(key);
                None
            }
            None => None,
        }
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// `stored_at` is taken from the store's clock. The retention TTL is
    /// the freshness window plus [`REVALIDATION_RETENTION_SECS`], so a
    /// stale entry can still answer conditional revalidation for a bounded
    /// while after its window closes.
    ///
    /// `max_age_secs` is origin-controlled, so the deadline arithmetic
    /// saturates rather than overflowing; a `max-age` beyond representable
    /// time retains the entry until replaced or reset.
    pub fn set(&self, key: &str, etag: impl Into<String>, max_age_secs: u64, payload: serde_json::Value) {
        let stored_at = self.clock.now();
        let retention_secs = max_age_secs.saturating_add(REVALIDATION_RETENTION_SECS);
        let slot = Slot {
            entry: Entry {
                etag: etag.into(),
                payload,
                max_age_secs,
                stored_at,
            },
            expires_at: stored_at.checked_add(Duration::from_secs(retention_secs)),
        };
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_owned(), slot);
        }
    }

    /// Clears all entries. Subsequent requests behave as first-time misses.
    pub fn reset(&self) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.clear();
        }
    }

    /// Returns the number of retained entries, expired or not.
    pub fn len(&self) -> usize {
        self.slots.lock().map(|slots| slots.len()).unwrap_or(0)
    }

    /// Returns `true` if the store retains no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EntryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// A hand-advanced clock for deterministic time-based tests.
#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Arc<Mutex<SystemTime>>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new(start: SystemTime) -> Self {
        Self {
            now: std::sync::Arc::new(Mutex::new(start)),
        }
    }

    /// Returns a handle sharing this clock's time, so a test can keep
    /// advancing time after handing the clock to a store.
    pub(crate) fn handle(&self) -> Self {
        Self {
            now: std::sync::Arc::clone(&self.now),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.now.lock().unwrap()
    }
}
