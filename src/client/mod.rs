//! Thin client orchestrator.
//!
//! [`Client`] wraps a [`Transport`] and runs the caching hooks around each
//! exchange. All of the logic lives in [`CacheLayer`]; the client is the
//! sequencing only:
//!
//! ```text
//! on_request ── ServedFromCache ──────────────────────▶ Ok(response)
//!           └── Proceed ─▶ transport.send ── Ok  ─▶ on_response
//!                                         └─ Err ─▶ on_failure
//! ```

use std::sync::Arc;

use crate::cache::store::EntryStore;
use crate::http::{Request, Response};
use crate::layer::{CacheLayer, Dispatch};
use crate::transport::{Transport, TransportError};

/// An HTTP client with transparent ETag/max-age response caching.
///
/// # Examples
///
/// ```rust,no_run
/// use etag_cache::{Client, Request, Response, StatusCode, TransportError};
/// use serde_json::json;
///
/// #[tokio::main]
/// async fn main() -> Result<(), TransportError> {
///     let client = Client::new(|request: Request| async move {
///         Ok::<_, TransportError>(Response::new(StatusCode::Ok, request)
///             .header("etag", "\"v1\"")
///             .header("cache-control", "max-age=60")
///             .with_data(json!({"hello": "world"})))
///     });
///
///     let first = client.get("https://api.test/greeting").await?;
///     // identical request inside the window: answered locally
///     let second = client.get("https://api.test/greeting").await?;
///     assert_eq!(first.data(), second.data());
///     Ok(())
/// }
/// ```
pub struct Client<T: Transport> {
    transport: T,
    layer: CacheLayer,
}

impl<T: Transport> Client<T> {
    /// Creates a client with a fresh store backed by the system clock.
    pub fn new(transport: T) -> Self {
        Self::with_store(transport, Arc::new(EntryStore::new()))
    }

    /// Creates a client over an explicitly constructed store, which may be
    /// shared with other clients or carry an injected clock.
    pub fn with_store(transport: T, store: Arc<EntryStore>) -> Self {
        Self {
            transport,
            layer: CacheLayer::new(store),
        }
    }

    /// Returns the entry store, for explicit invalidation via
    /// [`EntryStore::reset`].
    pub fn store(&self) -> &Arc<EntryStore> {
        self.layer.store()
    }

    /// Dispatches a request through the caching hooks.
    ///
    /// # Errors
    ///
    /// Propagates any [`TransportError`] the hooks did not recover: every
    /// failure except a 304 backed by a retained entry.
    pub async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        match self.layer.on_request(request) {
            Dispatch::ServedFromCache(response) => Ok(response),
            Dispatch::Proceed(request) => match self.transport.send(request).await {
                Ok(response) => Ok(self.layer.on_response(response)),
                Err(error) => self.layer.on_failure(error),
            },
        }
    }

    /// Convenience for `execute(Request::get(url))`.
    pub async fn get(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.execute(Request::get(url)).await
    }

    /// Convenience for `execute(Request::head(url))`.
    pub async fn head(&self, url: impl Into<String>) -> Result<Response, TransportError> {
        self.execute(Request::head(url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::ManualClock;
    use crate::http::headers::IF_NONE_MATCH;
    use crate::http::{Method, StatusCode};
    use serde_json::json;
    use std::sync::Mutex;
    use std::time::{Duration, SystemTime};

    /// Records every request that reaches the "network" and answers like an
    /// origin that supports ETag revalidation: a conditional request with
    /// the current tag gets 304, anything else gets a full 200.
    struct FakeOrigin {
        calls: Mutex<Vec<Request>>,
        etag: &'static str,
        cache_control: &'static str,
        body: serde_json::Value,
    }

    impl FakeOrigin {
        fn new(etag: &'static str, cache_control: &'static str, body: serde_json::Value) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                etag,
                cache_control,
                body,
            })
        }

        fn calls(&self) -> Vec<Request> {
            self.calls.lock().unwrap().clone()
        }

        fn transport(origin: &Arc<Self>) -> impl Transport + use<> {
            let origin = Arc::clone(origin);
            move |request: Request| {
                let origin = Arc::clone(&origin);
                async move {
                    origin.calls.lock().unwrap().push(request.clone());
                    if request.headers().get(IF_NONE_MATCH) == Some(origin.etag) {
                        return Err(TransportError::Status {
                            response: Response::new(StatusCode::NotModified, request)
                                .header("etag", origin.etag),
                        });
                    }
                    Ok(Response::new(StatusCode::Ok, request)
                        .header("etag", origin.etag)
                        .header("cache-control", origin.cache_control)
                        .with_data(origin.body.clone()))
                }
            }
        }
    }

    fn client_with_manual_clock(
        origin: &Arc<FakeOrigin>,
    ) -> (ManualClock, Client<impl Transport + use<>>) {
        let clock = ManualClock::new(SystemTime::UNIX_EPOCH);
        let store = Arc::new(EntryStore::with_clock(clock.handle()));
        (clock, Client::with_store(FakeOrigin::transport(origin), store))
    }

    #[tokio::test]
    async fn fresh_repeat_is_served_with_zero_network_calls() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!({"hello": "world"}));
        let (_clock, client) = client_with_manual_clock(&origin);

        let first = client.get("/greeting").await.unwrap();
        let second = client.get("/greeting").await.unwrap();

        assert_eq!(origin.calls().len(), 1);
        assert_eq!(first.data(), second.data());
        assert_eq!(second.status_line(), "Retrieved from cache");
    }

    #[tokio::test]
    async fn expired_window_sends_conditional_request() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!({"hello": "world"}));
        let (clock, client) = client_with_manual_clock(&origin);

        client.get("/greeting").await.unwrap();
        clock.advance(Duration::from_secs(60));

        let revalidated = client.get("/greeting").await.unwrap();

        let calls = origin.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[0].headers().contains(IF_NONE_MATCH));
        assert_eq!(calls[1].headers().get(IF_NONE_MATCH), Some("\"abc\""));
        // the 304 was rewritten into a success carrying the cached payload
        assert!(revalidated.status().is_success());
        assert_eq!(revalidated.data(), &json!({"hello": "world"}));
    }

    #[tokio::test]
    async fn widgets_scenario() {
        // GET /widgets -> 200 {id:1}, etag "w1", max-age=30.
        let origin = FakeOrigin::new("\"w1\"", "max-age=30", json!({"id": 1}));
        let (clock, client) = client_with_manual_clock(&origin);

        let first = client.get("/widgets").await.unwrap();
        assert_eq!(first.data(), &json!({"id": 1}));

        // Immediate repeat: no network call.
        let repeat = client.get("/widgets").await.unwrap();
        assert_eq!(repeat.data(), &json!({"id": 1}));
        assert_eq!(origin.calls().len(), 1);

        // After 31 simulated seconds the origin answers 304; the observed
        // result is still a success carrying {id:1}.
        clock.advance(Duration::from_secs(31));
        let after = client.get("/widgets").await.unwrap();
        assert!(after.status().is_success());
        assert_eq!(after.data(), &json!({"id": 1}));
        assert_eq!(origin.calls().len(), 2);
    }

    #[tokio::test]
    async fn non_cacheable_methods_never_touch_the_store() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!({"ok": true}));
        let (_clock, client) = client_with_manual_clock(&origin);

        for method in [Method::Post, Method::Put, Method::Delete] {
            client
                .execute(Request::new(method, "/widgets").body(json!({"id": 9})))
                .await
                .unwrap();
        }

        assert!(client.store().is_empty());
        assert_eq!(origin.calls().len(), 3);
        for call in origin.calls() {
            assert!(!call.headers().contains(IF_NONE_MATCH));
        }
    }

    #[tokio::test]
    async fn head_requests_are_cached_like_get() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!(null));
        let (_clock, client) = client_with_manual_clock(&origin);

        client.head("/widgets").await.unwrap();
        client.head("/widgets").await.unwrap();
        assert_eq!(origin.calls().len(), 1);
    }

    #[tokio::test]
    async fn malformed_cache_control_always_revalidates() {
        let origin = FakeOrigin::new("\"m1\"", "max-age=banana", json!({"id": 3}));
        let (_clock, client) = client_with_manual_clock(&origin);

        client.get("/widgets").await.unwrap();
        // stored with max_age 0: the repeat goes out conditionally and the
        // 304 is recovered from the store, never served purely locally
        let second = client.get("/widgets").await.unwrap();

        let calls = origin.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].headers().get(IF_NONE_MATCH), Some("\"m1\""));
        assert!(second.status().is_success());
        assert_eq!(second.data(), &json!({"id": 3}));
    }

    #[tokio::test]
    async fn reset_makes_the_next_request_a_first_time_miss() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!({"id": 1}));
        let (_clock, client) = client_with_manual_clock(&origin);

        client.get("/widgets").await.unwrap();
        client.store().reset();
        let after_reset = client.get("/widgets").await.unwrap();

        let calls = origin.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls[1].headers().contains(IF_NONE_MATCH));
        assert_eq!(after_reset.data(), &json!({"id": 1}));
    }

    #[tokio::test]
    async fn requests_with_different_query_are_cached_separately() {
        let origin = FakeOrigin::new("\"abc\"", "max-age=60", json!([1, 2]));
        let (_clock, client) = client_with_manual_clock(&origin);

        client
            .execute(Request::get("/widgets").query("page", "1"))
            .await
            .unwrap();
        client
            .execute(Request::get("/widgets").query("page", "2"))
            .await
            .unwrap();
        // same parameters in a different order: cache hit, no network
        client
            .execute(Request::get("/widgets").query("page", "1"))
            .await
            .unwrap();

        assert_eq!(origin.calls().len(), 2);
        assert_eq!(client.store().len(), 2);
    }

    #[tokio::test]
    async fn genuine_failures_surface_to_the_caller() {
        let transport = |request: Request| async move {
            Err::<Response, _>(TransportError::Status {
                response: Response::new(StatusCode::ServiceUnavailable, request),
            })
        };
        let client = Client::new(transport);

        let error = client.get("/widgets").await.expect_err("503 must surface");
        assert_eq!(
            error.response().map(Response::status),
            Some(StatusCode::ServiceUnavailable)
        );
    }
}
