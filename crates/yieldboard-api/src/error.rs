use serde::Deserialize;
use thiserror::Error;

/// Error body shape returned by the admin backend on non-2xx responses.
///
/// Only `message` is consistently present; the profile endpoint adds
/// `suggestion(s)` and `warning`, which land in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Top-level error type for the `yieldboard-api` crate.
///
/// Covers every failure mode of a single request: transport, URL
/// construction, HTTP error statuses, and payload decoding.
/// `yieldboard-core` normalizes these into message-only failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// The backend answered with a non-success status.
    /// `body` is present when the response decoded as a JSON error body.
    #[error("HTTP {status}: {}", body.as_ref().and_then(|b| b.message.as_deref()).unwrap_or("no error message"))]
    Http {
        status: u16,
        body: Option<ErrorBody>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the backend rejected the session credentials.
    pub fn is_auth_expired(&self) -> bool {
        match self {
            Self::Http { status, .. } => matches!(status, 401 | 403),
            Self::Transport(e) => matches!(
                e.status(),
                Some(reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN)
            ),
            _ => false,
        }
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }

    /// The HTTP status attached to this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// The `message` field of the decoded error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Http {
                body: Some(body), ..
            } => body.message.as_deref(),
            _ => None,
        }
    }
}
