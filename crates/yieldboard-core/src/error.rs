// ── Core error types ──
//
// Errors for operations that are NOT routed through the result normalizer.
// Only building the HTTP client can fail this way; gateway calls settle
// into a `Failure` instead.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The client could not be built (unreadable or invalid CA bundle,
    /// TLS backend setup).
    #[error("Cannot set up a client for {url}: {reason}")]
    ClientSetup { url: String, reason: String },
}
