//! CLI configuration -- thin wrapper around `purehost_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--array, --api-token, --insecure, --timeout).

use std::time::Duration;

use secrecy::SecretString;

use purehost_core::{ArrayConfig, AuthCredentials, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use purehost_config::{Config, Defaults, Profile, config_path, load_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref()).to_owned()
}

/// Build an `ArrayConfig` from the config file, profile, and CLI overrides.
pub fn build_array_config(global: &GlobalOpts) -> Result<ArrayConfig, CliError> {
    let cfg = load_config()?;
    resolve(&cfg, global)
}

fn resolve(cfg: &Config, global: &GlobalOpts) -> Result<ArrayConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    // A named profile must exist; the implicit default may be absent.
    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, &cfg.defaults, global);
    }
    if global.profile.is_some() {
        let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
        available.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if available.is_empty() {
                "(none)".into()
            } else {
                available.join(", ")
            },
        });
    }

    // No profile -- build from CLI flags / env vars alone
    let url_str = global.array.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let url = parse_array_url(url_str)?;

    let Some(ref token) = global.api_token else {
        return Err(CliError::NoCredentials {
            profile: profile_name,
        });
    };

    let mut config = ArrayConfig::new(url, AuthCredentials::ApiToken(SecretString::from(token.clone())));
    config.tls = if global.insecure || cfg.defaults.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        TlsVerification::SystemDefaults
    };
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(config)
}

/// Translate a `Profile` + global flags into an `ArrayConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ArrayConfig, CliError> {
    // 1. Array URL (flag > env > profile)
    let url = match global.array {
        Some(ref url_str) => parse_array_url(url_str)?,
        None => purehost_config::array_url(profile)?,
    };

    // 2. Credentials (flag > env > keyring > plaintext)
    let auth = match global.api_token {
        Some(ref token) => AuthCredentials::ApiToken(SecretString::from(token.clone())),
        None => purehost_config::resolve_auth(profile, profile_name)?,
    };

    let mut config = ArrayConfig::new(url, auth);
    if let Some(ref version) = profile.api_version {
        config.api_version.clone_from(version);
    }

    // 3. TLS verification
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        purehost_config::tls_for(profile, defaults)
    };

    // 4. Timeout (flag > profile > defaults)
    let secs = global
        .timeout
        .unwrap_or_else(|| purehost_config::timeout_for(profile, defaults));
    config.timeout = Duration::from_secs(secs);
    Ok(config)
}

fn parse_array_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "array".into(),
        reason: format!("invalid URL: {raw}"),
    })
}
