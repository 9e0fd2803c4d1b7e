//! Config command handlers. None of these talk to an array.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Map an interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let rendered = purehost_config::redacted_toml(&cfg)?;
            output::print_output(rendered.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let token = rpassword::prompt_password("API token: ").map_err(prompt_err)?;
            let token = token.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "api_token".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            purehost_config::store_api_token(&profile_name, token)?;
            output::print_status(
                &output::status_line(
                    &global.color,
                    "stored",
                    &format!("API token for profile '{profile_name}' in the system keyring"),
                ),
                global.quiet,
            );
            Ok(())
        }
    }
}
