//! `beach start`: start the instance of the current project.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance::{self, StartOptions};
use crate::application::services::project::activate_sandbox;

/// Arguments for the start command.
#[derive(Args)]
pub struct StartArgs {
    /// Pull images before starting
    #[arg(short, long)]
    pub pull: bool,
}

/// Run `beach start`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or the instance
/// fails to start.
pub async fn run(app: &AppContext, args: &StartArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let opts = StartOptions {
        layout: &app.layout,
        policy: app.readiness,
        pull: args.pull,
    };

    instance::start(
        &app.engine,
        &app.fs,
        &app.assets,
        &app.reporter(),
        &sandbox,
        opts,
    )
    .await?;

    app.output.success(&format!(
        "Instance {} is running, open it at:",
        sandbox.project_name
    ));
    app.output.url(&sandbox.url());
    Ok(ExitCode::SUCCESS)
}
