use thiserror::Error;

/// Top-level error type for the `purehost-api` crate.
///
/// Covers every failure mode of the array REST surface: authentication,
/// transport, array-reported errors, and payload decoding.
/// `purehost-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// API token exchange or session login rejected, or session expired.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Array API ───────────────────────────────────────────────────
    /// The addressed object does not exist on the array.
    ///
    /// Purity reports most missing objects as HTTP 400 with a
    /// "does not exist" message rather than a 404.
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other non-success response, with the array's own message.
    #[error("Array API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}
