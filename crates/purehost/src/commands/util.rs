//! Shared helpers for command handlers.

use std::io::{IsTerminal, Read};
use std::path::Path;

use purehost_core::HostSpec;

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, the operation is refused rather than
/// silently confirmed.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and parse a host spec for `--file`. `-` reads stdin.
///
/// YAML is a superset of JSON, so one parser covers both.
pub fn read_spec_file(path: &Path) -> Result<HostSpec, CliError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    parse_spec(&contents)
}

fn parse_spec(contents: &str) -> Result<HostSpec, CliError> {
    let spec: HostSpec = serde_yaml::from_str(contents)?;
    spec.validate()?;
    Ok(spec)
}
