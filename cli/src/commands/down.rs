//! `beach down`: take down all running instances and Local Beach.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::local_beach;

/// Run `beach down`.
///
/// # Errors
///
/// Returns an error if containers cannot be listed or compose fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    local_beach::down_all(&app.engine, &app.fs, &app.reporter(), &app.layout).await?;
    Ok(ExitCode::SUCCESS)
}
