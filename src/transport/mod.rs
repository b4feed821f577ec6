//! The external transport contract.
//!
//! The caching layer never performs network I/O itself; it wraps a
//! [`Transport`], the collaborator that actually sends requests. Any type
//! that can turn a [`Request`] into a `Result<Response, TransportError>`
//! future qualifies, including plain async closures via the blanket impl.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::http::{Request, Response};

/// A pinned, boxed, `Send` future, the return type of [`Transport::send`].
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// A failure reported by the transport.
///
/// These are the only error kinds flowing through the layer; the caching
/// core fabricates no failures of its own. A [`Status`](Self::Status)
/// failure carries the full response description, which is how a 304
/// outcome reaches the revalidation hook.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange failed below the HTTP layer (DNS, connect, timeout).
    #[error("request to {url} failed: {message}")]
    Network {
        /// Target URL of the failed request.
        url: String,
        /// Transport-specific failure description.
        message: String,
    },

    /// The origin answered with a non-success status.
    #[error("request to {} failed with status {}", .response.request().url(), .response.status())]
    Status {
        /// The full response description, including the echoed request.
        response: Response,
    },
}

impl TransportError {
    /// Returns the target URL of the failed request.
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } => url,
            Self::Status { response } => response.request().url(),
        }
    }

    /// Returns the response carried by this failure, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Network { .. } => None,
            Self::Status { response } => Some(response),
        }
    }
}

/// An HTTP client transport the caching layer can wrap.
///
/// Implementations must be `Send + Sync`; one transport instance is shared
/// across all in-flight requests.
pub trait Transport: Send + Sync {
    /// Sends the request and resolves to the origin's response or a failure.
    fn send(&self, request: Request) -> BoxFuture<Result<Response, TransportError>>;
}

/// Any async function from request to result is a transport. This keeps
/// tests and demos free of adapter boilerplate.
impl<F, Fut> Transport for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response, TransportError>> + Send + 'static,
{
    fn send(&self, request: Request) -> BoxFuture<Result<Response, TransportError>> {
        Box::pin(self(request))
    }
}
