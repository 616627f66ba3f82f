//! `beach status`: show the containers of the current instance.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::instance;
use crate::application::services::project::activate_sandbox;
use crate::commands::exit_code;

/// Run `beach status`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or compose cannot be
/// spawned.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let status = instance::status(&app.engine, &sandbox).await?;
    Ok(exit_code(status))
}
