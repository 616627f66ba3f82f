//! `beach resume`: start a paused Local Beach.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::local_beach;

/// Run `beach resume`.
///
/// # Errors
///
/// Returns an error if compose fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    local_beach::resume(&app.engine, &app.layout).await?;
    app.output.success("Local Beach resumed.");
    Ok(ExitCode::SUCCESS)
}
