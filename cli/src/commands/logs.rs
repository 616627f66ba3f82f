//! `beach logs`: show application or container logs of the current instance.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::instance::{self, LogOptions};
use crate::application::services::project::activate_sandbox;
use crate::commands::exit_code;

/// Arguments for the logs command.
#[derive(Args)]
pub struct LogsArgs {
    /// Keep following the log output
    #[arg(short, long)]
    pub follow: bool,

    /// Number of lines to show from the end of the logs
    #[arg(short, long, default_value_t = 10)]
    pub tail: u32,

    /// Show container output instead of the application logs
    #[arg(short, long)]
    pub containers: bool,
}

/// Run `beach logs`.
///
/// # Errors
///
/// Returns an error if the project cannot be activated or the engine cannot
/// be spawned.
pub async fn run(app: &AppContext, args: &LogsArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let opts = LogOptions {
        follow: args.follow,
        tail: args.tail,
        containers: args.containers,
    };
    let status = instance::logs(&app.engine, &sandbox, opts).await?;
    Ok(exit_code(status))
}
