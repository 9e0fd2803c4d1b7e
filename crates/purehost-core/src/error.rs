// ── Core error types ──
//
// User-facing errors from purehost-core. Consumers never see HTTP status
// handling or JSON parse failures directly: `From<purehost_api::Error>`
// translates transport-layer errors into domain variants.

use thiserror::Error;

use crate::reconciler::AppliedStep;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to array at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Array request timed out")]
    Timeout,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Host not found: {name}")]
    HostNotFound { name: String },

    /// A remote object addressed by a call does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    /// Desired state rejected locally, before any remote call.
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("Array API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the addressed object is gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::HostNotFound { .. } | Self::NotFound { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<purehost_api::Error> for CoreError {
    fn from(err: purehost_api::Error) -> Self {
        match err {
            purehost_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            purehost_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            purehost_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            purehost_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            purehost_api::Error::NotFound { message } => CoreError::NotFound { message },
            purehost_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            purehost_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── Reconciliation failures ──────────────────────────────────────────

/// A lifecycle operation failed part-way.
///
/// Carries the remote mutations that already succeeded, in order, so the
/// caller can persist progress. Nothing is rolled back.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ReconcileError {
    /// Name the host currently answers to on the array, if it exists.
    pub identity: Option<String>,
    /// Steps applied before the failure.
    pub applied: Vec<AppliedStep>,
    pub source: CoreError,
}

impl ReconcileError {
    /// Whether any remote mutation happened before the failure.
    pub fn is_partial(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Failures before the first remote call carry no progress.
impl From<CoreError> for ReconcileError {
    fn from(source: CoreError) -> Self {
        Self {
            identity: None,
            applied: Vec::new(),
            source,
        }
    }
}
