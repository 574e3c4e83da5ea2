//! Transport-neutral HTTP request/response values and the `Transport` seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client sends these through `fetch` (`gloo-net`), the CLI through
//! `reqwest`, and tests through a scripted mock. The API client only ever sees
//! these types.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, TransportError};

/// HTTP verbs used by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// A fully resolved request ready for a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status plus raw body. Callers decide whether the body is JSON, text or binary.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Body`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Body(e.to_string()))
    }

    /// Decode the body as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Body`] when the body is not valid UTF-8.
    pub fn text(&self) -> Result<String, ApiError> {
        String::from_utf8(self.body.clone()).map_err(|e| ApiError::Body(e.to_string()))
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}

/// Executes a single HTTP exchange.
///
/// Futures are not required to be `Send` because browser fetch futures are not.
#[async_trait::async_trait(?Send)]
pub trait Transport: Send + Sync {
    /// Send `request` and return whatever status the server produced.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] only when no HTTP response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}
