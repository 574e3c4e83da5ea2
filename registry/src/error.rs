//! Error taxonomy for the session and request layers.
//!
//! ERROR HANDLING
//! ==============
//! `DecodeError` means "not logged in" to every caller. `ApiError` is what
//! pages surface as notifications. `LoginError` wraps the ways a sign-in can
//! fail without ever leaving a half-applied session behind.

/// Fixed message surfaced when the backend rejects the bearer credential.
pub const SESSION_EXPIRED_MESSAGE: &str = "session expired, please sign in again";

/// Fixed message surfaced when the backend cannot be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str = "cannot reach the server, make sure it is running";

/// Fallback message for non-2xx responses without a readable error body.
#[must_use]
pub fn server_error_message(status: u16) -> String {
    format!("server error: {status}")
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Failure reported by a [`crate::http::Transport`] before any HTTP status exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection refused, DNS failure, CORS rejection and similar fetch failures.
    #[error("connection failed: {0}")]
    Connect(String),
    /// Anything else the transport could not complete (body read, request build).
    #[error("request failed: {0}")]
    Other(String),
}

// =============================================================================
// DECODE
// =============================================================================

/// A credential whose claims segment could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The credential is not three dot-separated segments with a payload.
    #[error("credential is missing its claims segment")]
    MissingSegment,
    /// The claims segment is not valid base64.
    #[error("credential claims are not valid base64: {0}")]
    Base64(String),
    /// The decoded claims are not the expected JSON object.
    #[error("credential claims are not valid JSON: {0}")]
    Json(String),
}

// =============================================================================
// API
// =============================================================================

/// Normalized failure of an [`crate::api::ApiClient`] request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response other than an authenticated 401.
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The backend could not be reached.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,
    /// The backend rejected the bearer credential; the session has been cleared.
    #[error("{}", SESSION_EXPIRED_MESSAGE)]
    AuthExpired,
    /// The transport failed for a reason other than connectivity.
    #[error("transport failure: {0}")]
    Transport(String),
    /// A 2xx body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Body(String),
    /// The request body could not be serialized.
    #[error("invalid request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// HTTP status carried by this error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::AuthExpired => Some(401),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Connect(_) => Self::Network,
            TransportError::Other(message) => Self::Transport(message),
        }
    }
}

// =============================================================================
// LOGIN
// =============================================================================

/// Why a `login` call did not produce a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginError {
    /// The backend refused the username/password pair.
    #[error("invalid username or password (status {status})")]
    Rejected { status: u16 },
    /// The backend answered 2xx without an `OK` status and a credential.
    #[error("login response did not contain a credential")]
    Malformed,
    /// The issued credential could not be decoded.
    #[error("login credential is unreadable: {0}")]
    Decode(#[from] DecodeError),
    /// The issued credential was already expired.
    #[error("login credential is already expired")]
    Expired,
    /// Transport or profile failure.
    #[error(transparent)]
    Api(#[from] ApiError),
    /// A later login or a logout took over before this one finished.
    #[error("sign-in was superseded")]
    Superseded,
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
