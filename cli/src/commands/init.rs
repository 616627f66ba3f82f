//! `beach init`: write the Local Beach configuration of a Flow or Neos project.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::project::{existing_project_files, init_project};
use crate::domain::project::default_project_name;
use crate::domain::sanitize_project_name;

/// Arguments for the init command.
#[derive(Args)]
pub struct InitArgs {
    /// Project name; defaults to the name of the current directory
    #[arg(long)]
    pub project_name: Option<String>,
}

/// Run `beach init`.
///
/// # Errors
///
/// Returns an error if the project name is empty after sanitizing or a file
/// cannot be written.
pub fn run(app: &AppContext, args: &InitArgs) -> Result<ExitCode> {
    let cwd = app.cwd()?;
    let requested = args
        .project_name
        .clone()
        .unwrap_or_else(|| default_project_name(&cwd));
    let project_name = sanitize_project_name(&requested)?;

    let existing = existing_project_files(&app.fs, &cwd);
    if !existing.is_empty() {
        for path in &existing {
            app.output.warn(&format!("{} already exists", path.display()));
        }
        if !app.confirm("Overwrite the existing configuration?", false)? {
            app.output.info("Nothing was changed.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    init_project(&app.fs, &app.assets, &app.reporter(), &cwd, &project_name)?;
    app.output
        .success(&format!("Initialized Local Beach for project {project_name}"));
    app.output.info("Start the instance: beach start");
    Ok(ExitCode::SUCCESS)
}
