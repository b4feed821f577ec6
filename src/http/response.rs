//! Response descriptions.
//!
//! A [`Response`] is what the post-receive hooks operate on: status, status
//! text, headers, decoded JSON data, and an echo of the originating request
//! so the cache can re-derive the key the entry was written under.

use serde_json::Value;

use super::{Headers, Request, StatusCode};

/// A description of a received (or synthesized) HTTP response.
///
/// # Examples
///
/// ```
/// use etag_cache::{Request, Response, StatusCode};
/// use serde_json::json;
///
/// let response = Response::new(StatusCode::Ok, Request::get("/widgets"))
///     .header("etag", "\"w1\"")
///     .with_data(json!({"id": 1}));
///
/// assert!(response.status().is_success());
/// assert_eq!(response.data(), &json!({"id": 1}));
/// assert_eq!(response.request().url(), "/widgets");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    status_text: String,
    headers: Headers,
    data: Value,
    request: Request,
}

impl Response {
    /// Creates a response with the given status and originating request.
    ///
    /// The status text defaults to the canonical reason phrase and the data
    /// to JSON `null`.
    pub fn new(status: StatusCode, request: Request) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().to_owned(),
            headers: Headers::new(),
            data: Value::Null,
            request,
        }
    }

    /// Sets a response header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the decoded JSON response data.
    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Overrides the status text.
    #[must_use]
    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Returns the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the status text.
    pub fn status_line(&self) -> &str {
        &self.status_text
    }

    /// Returns the response headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the decoded response data.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Returns the originating request description.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Replaces the status code in place. Used when a 304 outcome is
    /// rewritten into a success.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Replaces the status text in place.
    pub fn set_status_text(&mut self, text: impl Into<String>) {
        self.status_text = text.into();
    }

    /// Replaces the response data in place.
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }
}
