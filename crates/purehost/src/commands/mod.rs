//! Command dispatch: bridges CLI args -> host reconciler -> output formatting.

pub mod config_cmd;
pub mod hosts;
pub mod util;

use purehost_core::ArraySession;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an array-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &ArraySession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Hosts(args) => hosts::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
