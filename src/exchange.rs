//! Live HTTP exchange types.
//!
//! These are the values crossing the boundary with whatever transport layer
//! the embedding harness intercepts: requests to be matched, responses to be
//! captured, and reconstructed stub responses handed back.

use base64::Engine;
use std::collections::HashMap;

/// An outbound request as seen by the interception layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpRequest {
    /// HTTP method, e.g. `GET`
    pub method: String,
    /// Absolute URL including scheme and host
    pub url: String,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body, if any
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Status line and headers of a live response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// A stub response rebuilt from a recorded interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseArtifact {
    /// URL the response is reported for
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HashMap<String, String>,
    /// Response body bytes (possibly empty)
    pub body: Vec<u8>,
}

impl ResponseArtifact {
    /// Body as UTF-8 text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

/// Encode bytes with the standard base64 alphabet.
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode base64url (or standard base64) text, with or without padding.
///
/// `-` and `_` are mapped to `+` and `/`, and the text is padded with `=` to
/// a multiple of four before decoding.
pub fn decode_base64url(text: &str) -> Option<Vec<u8>> {
    let mut standard: String = text
        .chars()
        .map(|ch| match ch {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let rem = standard.len() % 4;
    if rem > 0 {
        standard.push_str(&"=".repeat(4 - rem));
    }

    base64::engine::general_purpose::STANDARD
        .decode(standard)
        .ok()
}
