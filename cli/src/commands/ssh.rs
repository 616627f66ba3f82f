//! `beach ssh`: open a shell in the PHP container of the current instance.

use std::process::ExitCode;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::application::services::instance;
use crate::application::services::project::activate_sandbox;
use crate::commands::exit_code;

/// Run `beach ssh`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or the shell cannot
/// be spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let status = instance::ssh(&app.engine, &sandbox)
        .await
        .context("failed to open a shell in the instance")?;
    Ok(exit_code(status))
}
