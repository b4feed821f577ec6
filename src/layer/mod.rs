//! The caching interception hooks.
//!
//! [`CacheLayer`] implements the three extension points wired around every
//! request the client dispatches:
//!
//! - [`on_request`](CacheLayer::on_request) — pre-send: short-circuit fresh
//!   entries, attach `If-None-Match` for stale ones.
//! - [`on_response`](CacheLayer::on_response) — post-receive: record cache
//!   metadata from successful responses.
//! - [`on_failure`](CacheLayer::on_failure) — post-receive failure: rewrite
//!   a 304 backed by a known entry into a success, pass everything else
//!   through unchanged.
//!
//! A cache hit is expressed as an explicit [`Dispatch::ServedFromCache`]
//! value returned from the pre-send hook and consumed directly by the
//! orchestrator, never as an error travelling the failure channel, so it
//! can never be mistaken for a genuine transport fault.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::freshness::{self, Freshness};
use crate::cache::key;
use crate::cache::store::EntryStore;
use crate::http::headers::{CACHE_CONTROL, ETAG, IF_NONE_MATCH};
use crate::http::{Request, Response, StatusCode};
use crate::transport::TransportError;

/// Sentinel recorded when the origin sent no entity tag.
pub const NO_ETAG: &str = "no-etag";

/// Status text of a response synthesized from the store.
const FROM_CACHE_STATUS_TEXT: &str = "Retrieved from cache";

/// The pre-send decision: go to the network, or answer locally.
#[derive(Debug)]
pub enum Dispatch {
    /// Send this (possibly header-augmented) request over the transport.
    Proceed(Request),
    /// The entry is fresh; this synthesized response answers the request
    /// with zero network I/O.
    ServedFromCache(Response),
}

/// The caching decision engine, shared across all in-flight requests.
pub struct CacheLayer {
    store: Arc<EntryStore>,
}

impl CacheLayer {
    /// Creates a layer over the given store.
    pub fn new(store: Arc<EntryStore>) -> Self {
        Self { store }
    }

    /// Returns the underlying entry store.
    pub fn store(&self) -> &Arc<EntryStore> {
        &self.store
    }

    /// Pre-send hook.
    ///
    /// Non-cacheable methods pass through untouched and never consult the
    /// store. For GET and HEAD, the stored entry (if any) is evaluated for
    /// freshness: a fresh entry short-circuits with a synthesized success,
    /// a stale one proceeds carrying `If-None-Match` with the stored tag.
    /// Attaching that header is the only mutation performed on the request.
    pub fn on_request(&self, mut request: Request) -> Dispatch {
        if !request.method().is_cacheable() {
            return Dispatch::Proceed(request);
        }

        let key = key::request_key(&request);
        match freshness::evaluate(self.store.get(&key), self.store.now()) {
            Freshness::Miss => {
                debug!(url = %request.url(), "cache miss");
                Dispatch::Proceed(request)
            }
            Freshness::Fresh { payload } => {
                debug!(url = %request.url(), "cache fresh, serving stored payload");
                let response = Response::new(StatusCode::Ok, request)
                    .status_text(FROM_CACHE_STATUS_TEXT)
                    .with_data(payload);
                Dispatch::ServedFromCache(response)
            }
            Freshness::Stale { etag } => {
                debug!(url = %request.url(), %etag, "cache stale, revalidating");
                request.headers_mut().insert(IF_NONE_MATCH, etag);
                Dispatch::Proceed(request)
            }
        }
    }

    /// Post-receive hook.
    ///
    /// For cacheable methods, records one store entry keyed by the echoed
    /// request: the `etag` header (or the [`NO_ETAG`] sentinel) and the
    /// `max-age` directive parsed out of `cache-control`. A missing or
    /// malformed directive stores `max_age` 0 rather than failing, so the
    /// entry still serves conditional revalidation. The response itself is
    /// returned unmodified.
    pub fn on_response(&self, response: Response) -> Response {
        if !response.request().method().is_cacheable() {
            return response;
        }

        let etag = response.headers().get(ETAG).unwrap_or(NO_ETAG).to_owned();
        let max_age = parse_max_age(response.headers().get(CACHE_CONTROL));
        let key = key::request_key(response.request());

        debug!(url = %response.request().url(), %etag, max_age, "recording cache entry");
        self.store.set(&key, etag, max_age, response.data().clone());

        response
    }

    /// Post-receive failure hook.
    ///
    /// A failure carrying a 304 response whose originating request carries
    /// header fields, and whose key maps to a retained entry, is rewritten
    /// into a success with the stored payload; its other response fields
    /// are preserved. Every other failure is logged with the request target
    /// and returned unchanged; genuine transport faults are never
    /// swallowed.
    pub fn on_failure(&self, error: TransportError) -> Result<Response, TransportError> {
        match error {
            TransportError::Status { mut response }
                if response.status() == StatusCode::NotModified
                    && !response.request().headers().is_empty() =>
            {
                let key = key::request_key(response.request());
                match self.store.get(&key) {
                    Some(entry) => {
                        debug!(url = %response.request().url(), "304, serving stored payload");
                        // only status and body change; every other field,
                        // status text included, is preserved
                        response.set_status(StatusCode::Ok);
                        response.set_data(entry.payload);
                        Ok(response)
                    }
                    None => {
                        // 304 with nothing retained to replay: a real failure
                        let error = TransportError::Status { response };
                        warn!(url = %error.url(), %error, "transport failure passed through");
                        Err(error)
                    }
                }
            }
            error => {
                warn!(url = %error.url(), %error, "transport failure passed through");
                Err(error)
            }
        }
    }
}

/// Extracts the `max-age` directive from a `cache-control` header value.
///
/// `cache-control` may hold several comma-separated directives; only
/// `max-age=<seconds>` is interpreted. An absent header, missing directive,
/// or non-numeric value yields 0.
fn parse_max_age(cache_control: Option<&str>) -> u64 {
    let Some(value) = cache_control else {
        return 0;
    };
    value
        .split(',')
        .filter_map(|directive| {
            let (name, seconds) = directive.trim().split_once('=')?;
            name.trim().eq_ignore_ascii_case("max-age").then_some(seconds)
        })
        .find_map(|seconds| seconds.trim().parse().ok())
        .unwrap_or(0)
}
