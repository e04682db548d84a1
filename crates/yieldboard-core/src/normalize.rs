// ── Result normalization ──
//
// Every gateway call ends here. Whatever went wrong on the way (refused
// connection, HTTP error body, malformed JSON) collapses into a
// message-only `Failure`, and session expiry collapses into one sentinel
// message that callers can match on.

use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Message-only failure carried by every normalized result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Failure {
    message: String,
}

impl Failure {
    /// Shown when no server-provided message is available.
    pub const FALLBACK: &'static str = "Something went wrong!";
    /// Session-expiry sentinel.
    pub const SESSION_EXPIRED: &'static str = "Unauthorized";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn fallback() -> Self {
        Self::new(Self::FALLBACK)
    }

    pub fn session_expired() -> Self {
        Self::new(Self::SESSION_EXPIRED)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn into_message(self) -> String {
        self.message
    }

    pub fn is_session_expired(&self) -> bool {
        self.message == Self::SESSION_EXPIRED
    }

    /// Collapse a transport-layer error into its normalized message.
    pub fn from_api(err: &yieldboard_api::Error) -> Self {
        if err.is_auth_expired() {
            return Self::session_expired();
        }
        match err.server_message() {
            Some(message) if !message.is_empty() => Self::new(message),
            _ => {
                if matches!(err, yieldboard_api::Error::Deserialization { .. }) {
                    warn!(error = %err, "discarding malformed response payload");
                }
                Self::fallback()
            }
        }
    }
}

/// Success value or message-only failure.
pub type Normalized<T> = Result<T, Failure>;

/// One page of a listing with the server-reported total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Normalized result of a list call.
pub type ListResult<T> = Normalized<Page<T>>;

/// Run a transport call and normalize its outcome.
///
/// Never panics and never propagates: the returned value is always either
/// the transport body or a `Failure`.
pub async fn normalize<T, F, Fut>(call: F) -> Normalized<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, yieldboard_api::Error>>,
{
    match call().await {
        Ok(body) => Ok(body),
        Err(err) => {
            let failure = Failure::from_api(&err);
            debug!(
                status = err.status(),
                message = failure.message(),
                "request failed: {err}"
            );
            Err(failure)
        }
    }
}

// ── Structured rendering ─────────────────────────────────────────────

/// `{ data, error }` rendering of a normalized result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> From<Normalized<T>> for Envelope<T> {
    fn from(result: Normalized<T>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                error: None,
            },
            Err(failure) => Self {
                data: None,
                error: Some(failure.into_message()),
            },
        }
    }
}

/// `{ items, total, error }` rendering of a list result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub error: Option<String>,
}

impl<T> From<ListResult<T>> for ListEnvelope<T> {
    fn from(result: ListResult<T>) -> Self {
        match result {
            Ok(page) => Self {
                items: page.items,
                total: page.total,
                error: None,
            },
            Err(failure) => Self {
                items: Vec::new(),
                total: 0,
                error: Some(failure.into_message()),
            },
        }
    }
}
