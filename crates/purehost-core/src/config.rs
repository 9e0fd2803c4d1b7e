// ── Runtime connection configuration ──
//
// These types describe *how* to reach an array. They carry credential
// data and connection tuning, but never touch disk. The CLI builds an
// `ArrayConfig` and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use purehost_api::DEFAULT_API_VERSION;

/// How to authenticate with the array.
///
/// Named `AuthCredentials` to keep it apart from `purehost_api::Credentials`,
/// which it converts into.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// Pre-issued API token (preferred).
    ApiToken(SecretString),
    /// Username/password; exchanged for the user's API token on connect.
    Password {
        username: String,
        password: SecretString,
    },
}

impl From<&AuthCredentials> for purehost_api::Credentials {
    fn from(auth: &AuthCredentials) -> Self {
        match auth {
            AuthCredentials::ApiToken(token) => Self::ApiToken(token.clone()),
            AuthCredentials::Password { username, password } => Self::Password {
                username: username.clone(),
                password: password.clone(),
            },
        }
    }
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification, for arrays still on their self-signed certificate.
    DangerAcceptInvalid,
}

/// Configuration for connecting to a single array.
///
/// Built by the CLI, passed to `ArraySession` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ArrayConfig {
    /// Array management URL (e.g., `https://flasharray.example.com`).
    pub url: Url,
    /// Authentication method and credentials.
    pub auth: AuthCredentials,
    /// REST API version path segment.
    pub api_version: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
}

impl ArrayConfig {
    /// Config with default API version, TLS mode, and timeout.
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            api_version: DEFAULT_API_VERSION.into(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
