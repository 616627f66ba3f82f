//! `beach composer`: run Composer inside the PHP container.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance;
use crate::application::services::project::activate_sandbox;
use crate::commands::exit_code;

/// Arguments for the composer command.
#[derive(Args)]
#[command(trailing_var_arg = true)]
pub struct ComposerArgs {
    /// Arguments passed to Composer
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Run `beach composer`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or Composer cannot be
/// spawned.
pub async fn run(app: &AppContext, args: &ComposerArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let status = instance::composer(&app.engine, &sandbox, &args.args)
        .await
        .context("failed to run composer in instance")?;
    Ok(exit_code(status))
}
