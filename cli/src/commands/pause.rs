//! `beach pause`: stop Local Beach without removing anything.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::local_beach;

/// Run `beach pause`.
///
/// # Errors
///
/// Returns an error if compose fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    local_beach::pause(&app.engine, &app.layout).await?;
    app.output.success("Local Beach paused.");
    app.output.info("Resume: beach resume");
    Ok(ExitCode::SUCCESS)
}
