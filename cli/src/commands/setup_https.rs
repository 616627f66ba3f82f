//! `beach setup-https`: issue a trusted wildcard certificate with mkcert.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::local_beach;

/// Run `beach setup-https`.
///
/// # Errors
///
/// Returns an error if mkcert fails or the webserver cannot be restarted.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    local_beach::setup_https(&app.runner, &app.engine, &app.reporter(), &app.layout).await?;
    Ok(ExitCode::SUCCESS)
}
