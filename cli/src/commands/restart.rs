//! `beach restart`: recreate or restart the instance of the current project.

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Args};

use crate::app::AppContext;
use crate::application::services::instance::{self, StartOptions};
use crate::application::services::project::activate_sandbox;

/// Arguments for the restart command.
#[derive(Args)]
pub struct RestartArgs {
    /// Remove the containers and their volumes before starting them again
    #[arg(short, long, action = ArgAction::Set, default_value_t = true)]
    pub remove: bool,

    /// Pull images before starting
    #[arg(short, long)]
    pub pull: bool,
}

/// Run `beach restart`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or any compose step
/// fails.
pub async fn run(app: &AppContext, args: &RestartArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let opts = StartOptions {
        layout: &app.layout,
        policy: app.readiness,
        pull: args.pull,
    };

    instance::restart(
        &app.engine,
        &app.fs,
        &app.assets,
        &app.reporter(),
        &sandbox,
        opts,
        args.remove,
    )
    .await?;

    app.output.success(&format!(
        "Instance {} restarted, open it at:",
        sandbox.project_name
    ));
    app.output.url(&sandbox.url());
    Ok(ExitCode::SUCCESS)
}
