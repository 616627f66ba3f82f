//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, EnvironmentFlags, OutputFlags};
use crate::commands;
use crate::infra::engine::DEFAULT_ENGINE;

/// Local Beach: Flow and Neos development environments on your machine
#[derive(Parser)]
#[command(
    name = "beach",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Show diagnostic logging (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Answer "yes" to all confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Container engine binary
    #[arg(long, global = true, env = "LOCALBEACH_CONTAINER_ENGINE", default_value = DEFAULT_ENGINE)]
    pub engine: String,

    /// Local Beach home directory
    #[arg(long, global = true, env = "LOCALBEACH_BASE_PATH")]
    pub base_path: Option<PathBuf>,

    /// Folder used by the database server
    #[arg(long, global = true, env = "LOCALBEACH_DATABASE_FOLDER")]
    pub database_folder: Option<PathBuf>,

    /// Folder holding the webserver's TLS certificates
    #[arg(long, global = true, env = "LOCALBEACH_CERTIFICATES_FOLDER")]
    pub certificates_folder: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the Local Beach configuration for a Flow or Neos project
    Init(commands::init::InitArgs),

    /// Set up Local Beach on this host
    Setup,

    /// Install a trusted certificate for *.localbeach.net
    #[command(name = "setup-https")]
    SetupHttps,

    /// Start the project instance
    Start(commands::start::StartArgs),

    /// Stop the project instance
    Stop(commands::stop::StopArgs),

    /// Restart the project instance
    Restart(commands::restart::RestartArgs),

    /// Stop Local Beach, keeping all containers
    Pause,

    /// Start a paused Local Beach
    Resume,

    /// Take down all instances and Local Beach
    Down,

    /// Show the containers of the project instance
    Status,

    /// Show application or container logs
    Logs(commands::logs::LogsArgs),

    /// Open a shell in the PHP container
    Ssh,

    /// Run a command in the PHP container
    Exec(commands::exec::ExecArgs),

    /// Run Composer in the PHP container
    Composer(commands::composer::ComposerArgs),

    /// Download persistent resources from a Beach instance
    #[command(name = "resource-download")]
    ResourceDownload(commands::resources::DownloadArgs),

    /// Upload persistent resources to a Beach instance
    #[command(name = "resource-upload")]
    ResourceUpload(commands::resources::UploadArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Flags used to construct the [`AppContext`].
    #[must_use]
    pub fn app_flags(&self) -> AppFlags {
        AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
            },
            behaviour: BehaviourFlags { yes: self.yes },
            environment: EnvironmentFlags {
                engine: self.engine.clone(),
                base_path: self.base_path.clone(),
                database_folder: self.database_folder.clone(),
                certificates_folder: self.certificates_folder.clone(),
            },
        }
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        if matches!(self.command, Command::Version) {
            commands::version::run();
            return Ok(ExitCode::SUCCESS);
        }

        let app = AppContext::new(&self.app_flags())?;
        match &self.command {
            Command::Init(args) => commands::init::run(&app, args),
            Command::Setup => commands::setup::run(&app),
            Command::SetupHttps => commands::setup_https::run(&app).await,
            Command::Start(args) => commands::start::run(&app, args).await,
            Command::Stop(args) => commands::stop::run(&app, args).await,
            Command::Restart(args) => commands::restart::run(&app, args).await,
            Command::Pause => commands::pause::run(&app).await,
            Command::Resume => commands::resume::run(&app).await,
            Command::Down => commands::down::run(&app).await,
            Command::Status => commands::status::run(&app).await,
            Command::Logs(args) => commands::logs::run(&app, args).await,
            Command::Ssh => commands::ssh::run(&app).await,
            Command::Exec(args) => commands::exec::run(&app, args).await,
            Command::Composer(args) => commands::composer::run(&app, args).await,
            Command::ResourceDownload(args) => commands::resources::download(&app, args).await,
            Command::ResourceUpload(args) => commands::resources::upload(&app, args).await,
            Command::Version => Ok(ExitCode::SUCCESS),
        }
    }
}
