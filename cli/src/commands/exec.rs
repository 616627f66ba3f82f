//! `beach exec`: run a command inside the PHP container.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance;
use crate::application::services::project::activate_sandbox;
use crate::commands::exit_code;

/// Arguments for the exec command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ExecArgs {
    /// Command and arguments to run; opens a shell when omitted
    #[arg(allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Run a command inside the PHP container of the current instance.
///
/// Passes stdin, stdout, and stderr through transparently.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or the command cannot
/// be spawned.
pub async fn run(app: &AppContext, args: &ExecArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let status = instance::exec(&app.engine, &sandbox, &args.command)
        .await
        .context("failed to exec in instance")?;
    Ok(exit_code(status))
}
