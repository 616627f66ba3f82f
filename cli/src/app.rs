//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the output context and the production adapters for
//! every port, so command handlers never construct infrastructure types.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::{LocalBeachLayout, ReadinessPolicy};
use crate::infra::assets::EmbeddedAssets;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::engine::ContainerCli;
use crate::infra::fs::LocalFs;
use crate::infra::paths::resolve_layout;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `BEACH_YES` env vars).
    pub yes: bool,
}

/// Container engine and Local Beach location.
pub struct EnvironmentFlags {
    /// Container engine binary, e.g. `docker`.
    pub engine: String,
    /// Local Beach home; the platform default when `None`.
    pub base_path: Option<PathBuf>,
    /// Database folder; below the home when `None`.
    pub database_folder: Option<PathBuf>,
    /// Certificates folder; below the home when `None`.
    pub certificates_folder: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Engine and installation options.
    pub environment: EnvironmentFlags,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Container engine adapter.
    pub engine: ContainerCli<TokioCommandRunner>,
    /// Runner for tools other than the container engine (`mkcert`, `ssh`).
    pub runner: TokioCommandRunner,
    pub fs: LocalFs,
    pub assets: EmbeddedAssets,
    /// Directory layout of the Local Beach installation.
    pub layout: LocalBeachLayout,
    /// How long to wait for the database server.
    pub readiness: ReadinessPolicy,
    /// When `true`, skip interactive prompts and assume "yes".
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `BEACH_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if no base path is given and the platform default
    /// cannot be determined.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("BEACH_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let env = &flags.environment;
        let mut layout = resolve_layout(env.base_path.as_deref())?;
        if let Some(database) = &env.database_folder {
            layout.database.clone_from(database);
        }
        if let Some(certificates) = &env.certificates_folder {
            layout.certificates.clone_from(certificates);
        }

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            engine: ContainerCli::default_runner(&env.engine),
            runner: TokioCommandRunner::new(),
            fs: LocalFs,
            assets: EmbeddedAssets,
            layout,
            readiness: ReadinessPolicy::default(),
            non_interactive,
        })
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Current working directory, where project lookup starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn cwd(&self) -> Result<PathBuf> {
        std::env::current_dir().context("failed to determine the current directory")
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `BEACH_YES` env),
    /// returns `true` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
