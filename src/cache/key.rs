//! Cache key derivation.
//!
//! A request's cacheable identity is its target URL concatenated with a
//! canonical JSON serialization of its query parameters and body. The
//! pre-send and post-receive hooks derive keys independently of each other,
//! so the serialization must be deterministic: query pairs are sorted before
//! serializing, and JSON object keys serialize in sorted order, meaning two
//! requests that differ only in parameter order share a key.

use serde_json::Value;

use crate::http::Request;

/// Derives the cache key for a request description.
pub fn request_key(request: &Request) -> String {
    derive_key(request.url(), request.query_pairs(), request.body_json())
}

/// Derives a cache key from the parts of a request.
///
/// Deterministic and side-effect free. Absent query parameters and body
/// contribute empty strings, so `GET /a` with no parameters keys as `/a`.
pub fn derive_key(url: &str, query: &[(String, String)], body: Option<&Value>) -> String {
    let mut key = String::from(url);

    if !query.is_empty() {
        let mut pairs = query.to_vec();
        pairs.sort();
        // String pairs always serialize; Infallible
        key.push_str(&serde_json::to_string(&pairs).unwrap());
    }

    if let Some(body) = body {
        key.push_str(&body.to_string());
    }

    key
}
