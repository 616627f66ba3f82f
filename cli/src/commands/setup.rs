//! `beach setup`: prepare the Local Beach home directory.
//!
//! The database and certificate folders come from the global
//! `--database-folder` / `--certificates-folder` options so that later
//! starts render the same compose file.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::local_beach;

/// Run `beach setup`.
///
/// # Errors
///
/// Returns an error if a directory or the compose file cannot be written.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    local_beach::setup(&app.fs, &app.assets, &app.reporter(), &app.layout)?;
    app.output
        .kv("compose file", &app.layout.compose_file().display().to_string());
    app.output
        .kv("database", &app.layout.database.display().to_string());
    app.output
        .kv("certificates", &app.layout.certificates.display().to_string());
    Ok(ExitCode::SUCCESS)
}
