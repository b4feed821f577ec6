//! Header map with case-insensitive name lookup.
//!
//! HTTP header names are case-insensitive per RFC 9110 §5; origins vary
//! freely between `ETag`, `Etag` and `etag`, so every lookup here ignores
//! ASCII case.

use std::fmt;

/// Entity tag response header consumed when populating the cache.
pub const ETAG: &str = "etag";

/// Response header carrying the `max-age=<seconds>` directive.
pub const CACHE_CONTROL: &str = "cache-control";

/// Conditional request header produced for stale entries.
pub const IF_NONE_MATCH: &str = "If-None-Match";

/// A case-insensitive HTTP header map for request and response descriptions.
///
/// Each header name holds a single value; inserting an existing name
/// replaces its value. Insertion order of distinct names is preserved.
///
/// # Examples
///
/// ```
/// use etag_cache::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("ETag", "\"abc\"");
/// headers.insert("Cache-Control", "max-age=60");
///
/// assert_eq!(headers.get("etag"), Some("\"abc\""));
/// assert_eq!(headers.get("CACHE-CONTROL"), Some("max-age=60"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header. Replaces the value of an existing name (case-insensitive).
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .inner
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value for the given header name (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Removes the entry with the given header name (case-insensitive).
    ///
    /// Returns `true` if an entry was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.inner.len();
        self.inner.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.inner.len() < before
    }

    /// Returns `true` if the map contains an entry with the given name.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the number of header entries.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if there are no header entries.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.inner {
            writeln!(f, "{name}: {value}")?;
        }
        Ok(())
    }
}
