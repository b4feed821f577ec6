//! Outbound request descriptions.
//!
//! A [`Request`] is what the application hands to the client and what the
//! pre-send hook inspects: method, target URL, query parameters, optional
//! JSON body, and headers. It carries no connection state.

use serde_json::Value;

use super::{Headers, Method};

/// A description of an outbound HTTP request.
///
/// Built fluently, in the same style as [`Response`](super::Response):
///
/// ```
/// use etag_cache::{Method, Request};
///
/// let request = Request::new(Method::Get, "https://api.test/widgets")
///     .query("page", "2")
///     .header("Accept", "application/json");
///
/// assert_eq!(request.url(), "https://api.test/widgets");
/// assert_eq!(request.headers().get("accept"), Some("application/json"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    headers: Headers,
}

impl Request {
    /// Creates a request with the given method and target URL.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
            headers: Headers::new(),
        }
    }

    /// Shorthand for a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Shorthand for a HEAD request.
    pub fn head(url: impl Into<String>) -> Self {
        Self::new(Method::Head, url)
    }

    /// Appends a query parameter pair.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets the JSON request body.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets a request header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the target URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the query parameter pairs in insertion order.
    pub fn query_pairs(&self) -> &[(String, String)] {
        &self.query
    }

    /// Returns the JSON body, if any.
    pub fn body_json(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Returns the request headers.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns a mutable reference to the request headers.
    ///
    /// The pre-send hook uses this to attach the conditional header; it is
    /// the only mutation the caching layer performs on a request.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_parts() {
        let request = Request::new(Method::Post, "https://api.test/items")
            .query("a", "1")
            .query("b", "2")
            .body(json!({"name": "widget"}))
            .header("Content-Type", "application/json");

        assert_eq!(request.method(), &Method::Post);
        assert_eq!(request.url(), "https://api.test/items");
        assert_eq!(
            request.query_pairs(),
            &[("a".into(), "1".into()), ("b".into(), "2".into())]
        );
        assert_eq!(request.body_json(), Some(&json!({"name": "widget"})));
        assert_eq!(
            request.headers().get("content-type"),
            Some("application/json")
        );
    }

    #[test]
    fn get_and_head_shorthands() {
        assert_eq!(Request::get("/a").method(), &Method::Get);
        assert_eq!(Request::head("/a").method(), &Method::Head);
        assert!(Request::get("/a").body_json().is_none());
    }
}
