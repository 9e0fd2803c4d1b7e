//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError`, `ReconcileError` and `ConfigError` into user-facing
//! errors with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use purehost_config::ConfigError;
use purehost_core::{CoreError, ReconcileError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to array at {url}")]
    #[diagnostic(
        code(purehost::connection_failed),
        help(
            "Check that the array management address is reachable.\n\
             URL: {url}\n\
             Self-signed certificate? Try --insecure, or set ca_cert in your profile."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(purehost::timeout),
        help("Increase the timeout with --timeout or check array responsiveness.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(purehost::auth_failed),
        help(
            "Verify the API token (Settings > Users > API Tokens on the array).\n\
             Store a new one with: purehost config set-token"
        )
    )]
    AuthFailed { message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(purehost::no_credentials),
        help(
            "Store a token with: purehost config set-token --profile {profile}\n\
             Or set the PUREHOST_API_TOKEN environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(purehost::not_found),
        help("Run: purehost {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{message}")]
    #[diagnostic(code(purehost::missing_object))]
    MissingObject { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Array rejected the request ({status}): {message}")]
    #[diagnostic(code(purehost::api_error))]
    ApiError { status: String, message: String },

    /// A lifecycle operation failed after some changes were applied.
    #[error("{operation} of host '{host}' stopped part-way")]
    #[diagnostic(
        code(purehost::partial_apply),
        help(
            "Already applied (not rolled back):\n{applied}\n\
             Re-run the same command after fixing the cause to converge."
        )
    )]
    Partial {
        operation: String,
        host: String,
        applied: String,
        #[source]
        source: Box<CliError>,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(purehost::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(purehost::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No array configured")]
    #[diagnostic(
        code(purehost::no_config),
        help(
            "Pass --array and --api-token, or add a profile to\n\
             {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(purehost::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(purehost::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    #[diagnostic(code(purehost::json))]
    Json(#[from] serde_json::Error),

    #[error("Invalid host spec: {0}")]
    #[diagnostic(
        code(purehost::spec),
        help("Host specs are YAML or JSON with snake_case keys (iqn, wwn, connected_volumes, ...).")
    )]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::MissingObject { .. } => exit_code::NOT_FOUND,
            Self::Timeout => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } | Self::Yaml(_) => {
                exit_code::USAGE
            }
            Self::Partial { source, .. } => source.exit_code(),
            _ => exit_code::GENERAL,
        }
    }

    pub(crate) fn host_not_found(name: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: "host".into(),
            identifier: name.into(),
            list_command: "hosts list".into(),
        }
    }

    /// Attach the applied-step report of a failed lifecycle operation.
    pub(crate) fn from_reconcile(operation: &str, err: ReconcileError) -> Self {
        if !err.is_partial() {
            return err.source.into();
        }
        let applied = err
            .applied
            .iter()
            .map(|step| format!("  - {step}"))
            .collect::<Vec<_>>()
            .join("\n");
        Self::Partial {
            operation: operation.into(),
            host: err.identity.unwrap_or_else(|| "(deleted)".into()),
            applied,
            source: Box::new(err.source.into()),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },

            CoreError::Timeout => CliError::Timeout,

            CoreError::HostNotFound { name } => CliError::host_not_found(name),

            CoreError::NotFound { message } => CliError::MissingObject { message },

            CoreError::ValidationFailed { field, message } => CliError::Validation {
                field,
                reason: message,
            },

            CoreError::Api { message, status } => CliError::ApiError {
                status: status.map_or_else(|| "no status".into(), |s| format!("HTTP {s}")),
                message,
            },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                status: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
