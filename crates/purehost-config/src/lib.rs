//! Configuration for the purehost CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and the profile pieces of `purehost_core::ArrayConfig`. The CLI
//! layers its global flags on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use purehost_core::{AuthCredentials, TlsVerification};

/// Keyring service name under which secrets are stored.
pub const KEYRING_SERVICE: &str = "purehost";

/// Prefix for environment overrides, e.g. `PUREHOST_DEFAULT_PROFILE`.
pub const ENV_PREFIX: &str = "PUREHOST_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named array profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Name of the profile to use, honoring an explicit choice first.
    pub fn profile_name<'a>(&'a self, explicit: Option<&'a str>) -> &'a str {
        explicit
            .or(self.default_profile.as_deref())
            .unwrap_or("default")
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

/// Fallbacks for settings a profile leaves unset.
#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Skip certificate verification for profiles without `insecure` or `ca_cert`.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds for profiles without `timeout`.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

/// A named array profile.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Array management URL (e.g., "https://flasharray.example.com").
    pub array: String,

    /// REST API version, e.g. "1.17".
    pub api_version: Option<String>,

    /// Auth mode: "api-token" or "password".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// API token (plaintext -- prefer keyring or env var).
    pub api_token: Option<String>,

    /// Environment variable name containing the API token.
    pub api_token_env: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext -- prefer keyring).
    pub password: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout, in seconds.
    pub timeout: Option<u64>,
}

fn default_auth_mode() -> String {
    "api-token".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "purehost", "purehost").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("purehost");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment.
///
/// A missing file yields the defaults. Environment keys nest with a
/// double underscore: `PUREHOST_PROFILES__LAB__ARRAY`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Render a config as TOML with every secret replaced.
pub fn redacted_toml(cfg: &Config) -> Result<String, ConfigError> {
    let mut profiles = HashMap::with_capacity(cfg.profiles.len());
    for (name, profile) in &cfg.profiles {
        let mut profile = profile.clone();
        if profile.api_token.is_some() {
            profile.api_token = Some("<redacted>".into());
        }
        if profile.password.is_some() {
            profile.password = Some("<redacted>".into());
        }
        profiles.insert(name.clone(), profile);
    }
    let view = Config {
        default_profile: cfg.default_profile.clone(),
        defaults: Defaults {
            insecure: cfg.defaults.insecure,
            timeout: cfg.defaults.timeout,
        },
        profiles,
    };
    Ok(toml::to_string_pretty(&view)?)
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_entry(profile_name: &str, kind: &str) -> Result<keyring::Entry, keyring::Error> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/{kind}"))
}

/// Store an API token for a profile in the system keyring.
pub fn store_api_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "api-token")?.set_password(token)?;
    Ok(())
}

/// Resolve an API token from the credential chain (no CLI flag step).
pub fn resolve_api_token(
    profile: &Profile,
    profile_name: &str,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's api_token_env -> env var lookup
    if let Some(ref env_name) = profile.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring_entry(profile_name, "api-token") {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref token) = profile.api_token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve username + password without CLI flags.
pub fn resolve_password_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("PUREHOST_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    // 1. Env var
    if let Ok(pw) = std::env::var("PUREHOST_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    // 2. Keyring
    if let Ok(entry) = keyring_entry(profile_name, "password") {
        if let Ok(pw) = entry.get_password() {
            return Ok((username, SecretString::from(pw)));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Resolve `AuthCredentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "api-token" => Ok(AuthCredentials::ApiToken(resolve_api_token(
            profile,
            profile_name,
        )?)),
        "password" => {
            let (username, password) = resolve_password_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Password { username, password })
        }
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'api-token' or 'password', got '{other}'"),
        }),
    }
}

/// Parse the profile's array URL.
pub fn array_url(profile: &Profile) -> Result<url::Url, ConfigError> {
    profile.array.parse().map_err(|_| ConfigError::Validation {
        field: "array".into(),
        reason: format!("invalid URL: '{}'", profile.array),
    })
}

/// TLS strategy for a profile. Verification stays on unless the profile,
/// or `[defaults]` for a profile that says nothing, asks for `insecure`.
pub fn tls_for(profile: &Profile, defaults: &Defaults) -> TlsVerification {
    match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca_path)) => TlsVerification::CustomCa(ca_path.clone()),
        (None, None) if defaults.insecure => TlsVerification::DangerAcceptInvalid,
        _ => TlsVerification::SystemDefaults,
    }
}

/// Request timeout for a profile, in seconds.
pub fn timeout_for(profile: &Profile, defaults: &Defaults) -> u64 {
    profile.timeout.unwrap_or(defaults.timeout)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
timeout = 45

[profiles.lab]
array = "https://array.lab.example.com"
api_version = "1.19"
api_token = "plain-token"

[profiles.prod]
array = "https://array.prod.example.com"
auth_mode = "password"
username = "pureuser"
insecure = false
"#;

    #[test]
    fn loads_profiles_from_toml() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.profile_name(None), "lab");
            assert_eq!(cfg.profile_name(Some("prod")), "prod");
            assert_eq!(cfg.defaults.timeout, 45);
            assert!(!cfg.defaults.insecure);

            let lab = cfg.profile("lab").unwrap();
            assert_eq!(lab.auth_mode, "api-token");
            assert_eq!(lab.api_version.as_deref(), Some("1.19"));
            assert!(matches!(
                cfg.profile("nope"),
                Err(ConfigError::UnknownProfile { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", SAMPLE)?;
            jail.set_env("PUREHOST_DEFAULT_PROFILE", "prod");
            jail.set_env("PUREHOST_PROFILES__LAB__TIMEOUT", "5");
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            assert_eq!(cfg.profile_name(None), "prod");
            assert_eq!(cfg.profile("lab").unwrap().timeout, Some(5));
            Ok(())
        });
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.timeout, 30);
    }

    #[test]
    fn token_env_var_wins_over_plaintext() {
        Jail::expect_with(|jail| {
            jail.set_env("LAB_ARRAY_TOKEN", "from-env");
            let profile = Profile {
                array: "https://a.example.com".into(),
                api_token: Some("plain".into()),
                api_token_env: Some("LAB_ARRAY_TOKEN".into()),
                ..Profile::default()
            };
            let token = resolve_api_token(&profile, "lab").unwrap();
            assert_eq!(secrecy::ExposeSecret::expose_secret(&token), "from-env");
            Ok(())
        });
    }

    #[test]
    fn password_mode_needs_a_username() {
        Jail::expect_with(|_jail| {
            let profile = Profile {
                array: "https://a.example.com".into(),
                auth_mode: "password".into(),
                ..Profile::default()
            };
            assert!(matches!(
                resolve_auth(&profile, "ci-no-user"),
                Err(ConfigError::NoCredentials { .. })
            ));
            Ok(())
        });
    }

    #[test]
    fn unknown_auth_mode_is_rejected() {
        let profile = Profile {
            array: "https://a.example.com".into(),
            auth_mode: "kerberos".into(),
            ..Profile::default()
        };
        match resolve_auth(&profile, "lab") {
            Err(ConfigError::Validation { field, .. }) => assert_eq!(field, "auth_mode"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn tls_verifies_unless_asked_not_to() {
        let defaults = Defaults::default();
        let mut profile = Profile {
            array: "https://a.example.com".into(),
            ..Profile::default()
        };
        assert_eq!(tls_for(&profile, &defaults), TlsVerification::SystemDefaults);
        profile.insecure = Some(false);
        assert_eq!(tls_for(&profile, &defaults), TlsVerification::SystemDefaults);
        profile.ca_cert = Some(PathBuf::from("/etc/purehost/ca.pem"));
        assert_eq!(
            tls_for(&profile, &defaults),
            TlsVerification::CustomCa(PathBuf::from("/etc/purehost/ca.pem"))
        );
        profile.insecure = Some(true);
        assert_eq!(tls_for(&profile, &defaults), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn defaults_fill_in_what_the_profile_leaves_unset() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                "[defaults]\ninsecure = true\ntimeout = 45\n\n\
                 [profiles.lab]\narray = \"https://a.example.com\"\n\n\
                 [profiles.prod]\narray = \"https://b.example.com\"\ninsecure = false\ntimeout = 10\n",
            )?;
            let cfg = load_config_from(Path::new("config.toml")).unwrap();

            let lab = cfg.profile("lab").unwrap();
            assert_eq!(tls_for(lab, &cfg.defaults), TlsVerification::DangerAcceptInvalid);
            assert_eq!(timeout_for(lab, &cfg.defaults), 45);

            let prod = cfg.profile("prod").unwrap();
            assert_eq!(tls_for(prod, &cfg.defaults), TlsVerification::SystemDefaults);
            assert_eq!(timeout_for(prod, &cfg.defaults), 10);
            Ok(())
        });
    }

    #[test]
    fn bad_array_url_is_a_validation_error() {
        let profile = Profile {
            array: "not a url".into(),
            ..Profile::default()
        };
        assert!(matches!(
            array_url(&profile),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn redaction_hides_secrets() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                array: "https://a.example.com".into(),
                api_token: Some("super-secret".into()),
                ..Profile::default()
            },
        );
        let rendered = redacted_toml(&cfg).unwrap();
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("https://a.example.com"));
    }
}
