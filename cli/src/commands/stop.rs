//! `beach stop`: stop the instance of the current project.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance;
use crate::application::services::project::activate_sandbox;

/// Arguments for the stop command.
#[derive(Args)]
pub struct StopArgs {
    /// Also remove the containers and their volumes
    #[arg(short, long)]
    pub remove: bool,
}

/// Run `beach stop`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or compose fails.
pub async fn run(app: &AppContext, args: &StopArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    instance::stop(&app.engine, &sandbox, args.remove).await?;
    if args.remove {
        app.output.success("Instance removed.");
    } else {
        app.output.success("Instance stopped.");
        app.output.info("Resume: beach start");
    }
    Ok(ExitCode::SUCCESS)
}
