//! # etag-cache
//!
//! A transparent ETag/max-age response caching layer for HTTP client
//! transports.
//!
//! Two cooperating strategies sit between the application and the network:
//!
//! - **Freshness caching** — while a stored response is inside its
//!   `max-age` window, identical requests are answered locally with zero
//!   network I/O.
//! - **Conditional revalidation** — once the window closes, the request
//!   goes out carrying `If-None-Match` with the stored entity tag; a 304
//!   answer is rewritten into a full success from the stored payload.
//!
//! Only GET and HEAD participate; every other method bypasses the cache.
//! The store is in-process and memory-only.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use etag_cache::{Client, Request, Response, StatusCode, TransportError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TransportError> {
//!     // Any async fn from Request to Result<Response, TransportError>
//!     // is a transport; wrap a real HTTP client the same way.
//!     let client = Client::new(|request: Request| async move {
//!         Ok::<_, TransportError>(Response::new(StatusCode::Ok, request)
//!             .header("etag", "\"v1\"")
//!             .header("cache-control", "max-age=60")
//!             .with_data(serde_json::json!({"hello": "world"})))
//!     });
//!
//!     let first = client.get("https://api.test/greeting").await?;
//!     let second = client.get("https://api.test/greeting").await?; // no network call
//!     assert_eq!(first.data(), second.data());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod client;
pub mod http;
pub mod layer;
pub mod transport;

// Convenience re-exports
pub use cache::{Clock, Entry, EntryStore, Freshness, SystemClock};
pub use client::Client;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use layer::{CacheLayer, Dispatch};
pub use transport::{Transport, TransportError};
