//! HTTP exchange types passed across the transport seam.
//!
//! # Design
//! Requests and responses are plain data. `HttpTemplate` builds an
//! `HttpRequest`, hands it to a `Transport`, and validates the returned
//! `HttpResponse` without knowing which HTTP library produced it. Bodies are
//! raw bytes because encoding and decoding follow the configured charset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// HTTP method for a request.
///
/// `HttpTemplate` dispatches only `Get` and `Post`; the remaining methods
/// are rejected with `UnsupportedRequestMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Attach a body together with its `content-type` header.
    pub fn with_body(mut self, content_type: String, body: Vec<u8>) -> Self {
        self.headers.push(("content-type".to_string(), content_type));
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// `body` is `None` when the response carries no entity at all, which is
/// distinct from an entity of zero length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Whether a response to `method` with `status` can carry an entity.
pub fn response_has_body(method: HttpMethod, status: u16) -> bool {
    if method == HttpMethod::Head {
        return false;
    }
    !matches!(status, 100..=199 | 204 | 304)
}
