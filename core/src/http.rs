//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `HttpRequest` values and consumes `HttpResponse` values; the
//! actual I/O (sockets, TLS, OAuth signing) happens inside a host-provided
//! `Transport`. Swapping the transport is how tests run without a network
//! and how callers plug in their own signed HTTP stack.

use crate::params::Params;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` never carries a query string; query parameters live in `query` and
/// are appended by [`HttpRequest::uri`]. POST requests carry their form
/// parameters already encoded in `body`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Params,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// The full request URI, with the encoded query appended when non-empty.
    pub fn uri(&self) -> String {
        if self.query.is_empty() {
            self.url.clone()
        } else {
            format!("{}?{}", self.url, self.query.encode())
        }
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// First value of the named header, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Executes requests on behalf of the client.
///
/// Implementations perform the network round-trip (and any request signing)
/// and return the raw response. A non-2xx status is not a transport error;
/// the client interprets status codes itself.
pub trait Transport: Send + Sync {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Network-level failure reported by a `Transport`. Passed through to callers
/// unmodified inside `ApiError::Transport`.
#[derive(Debug, thiserror::Error)]
#[error("transport failed: {message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying I/O or client-library error.
    pub fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uri_without_query_is_bare_url() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.tumblr.com/v2/user/info".to_string(),
            query: Params::new(),
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(req.uri(), "https://api.tumblr.com/v2/user/info");
    }

    #[test]
    fn uri_appends_encoded_query() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.tumblr.com/v2/user/dashboard".to_string(),
            query: Params::new().with("offset", 20).with("type", "photo"),
            headers: Vec::new(),
            body: None,
        };
        assert_eq!(
            req.uri(),
            "https://api.tumblr.com/v2/user/dashboard?offset=20&type=photo"
        );
    }

    #[test]
    fn header_lookup_ignores_case() {
        let resp = HttpResponse {
            status: 301,
            headers: vec![("Location".to_string(), "https://a/b.png".to_string())],
            body: Vec::new(),
        };
        assert_eq!(resp.header("location"), Some("https://a/b.png"));
        assert_eq!(resp.header("content-type"), None);
    }

    #[test]
    fn transport_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = TransportError::from_source(io);
        assert_eq!(err.message(), "refused");
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&TransportError::new("x")).is_none());
    }
}
