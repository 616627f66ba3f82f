//! Project instance use-cases: start, stop, restart, status, logs and the
//! pass-through commands running inside the PHP container.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::ExitStatus;

use anyhow::{Context, Result, bail};

use crate::application::ports::{
    AssetSource, ComposeRunner, ComposeStack, ContainerEngine, ContainerRuntime, LocalFs,
    ProgressReporter,
};
use crate::application::services::local_beach::ensure_running;
use crate::domain::local_beach::{DATABASE_CONTAINER, create_database_statement};
use crate::domain::{LocalBeachLayout, ReadinessPolicy, Sandbox};

const APPLICATION_LOGS: &str = "/application/Data/Logs/*.log";
const COMPOSER: &str = "/application/composer";

/// The compose stack of a project instance.
#[must_use]
pub fn project_stack(sandbox: &Sandbox) -> ComposeStack {
    ComposeStack {
        file: sandbox.compose_file(),
        project: None,
        environment: sandbox.environment.clone(),
    }
}

/// Options shared by `start` and `restart`.
#[derive(Debug, Clone, Copy)]
pub struct StartOptions<'a> {
    pub layout: &'a LocalBeachLayout,
    pub policy: ReadinessPolicy,
    /// Pull images before starting the containers.
    pub pull: bool,
}

/// Start the instance, bringing up Local Beach first if needed.
///
/// # Errors
///
/// Returns an error if Local Beach cannot be started, compose fails, or the
/// project database cannot be created.
pub async fn start(
    engine: &impl ContainerEngine,
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    sandbox: &Sandbox,
    opts: StartOptions<'_>,
) -> Result<()> {
    ensure_running(engine, fs, assets, reporter, opts.layout, opts.policy).await?;
    up(engine, reporter, sandbox, opts.pull).await
}

/// Stop or remove the instance, then start it again.
///
/// # Errors
///
/// Returns an error if any compose step fails.
pub async fn restart(
    engine: &impl ContainerEngine,
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    sandbox: &Sandbox,
    opts: StartOptions<'_>,
    remove: bool,
) -> Result<()> {
    ensure_running(engine, fs, assets, reporter, opts.layout, opts.policy).await?;

    let stack = project_stack(sandbox);
    if remove {
        reporter.step("removing instance containers");
        engine
            .compose(&stack, &["down", "--remove-orphans", "--volumes"])
            .await?;
    } else {
        reporter.step("stopping instance containers");
        engine.compose(&stack, &["stop"]).await?;
    }
    up(engine, reporter, sandbox, opts.pull).await
}

async fn up(
    engine: &(impl ComposeRunner + ContainerRuntime),
    reporter: &impl ProgressReporter,
    sandbox: &Sandbox,
    pull: bool,
) -> Result<()> {
    let stack = project_stack(sandbox);
    if pull {
        tracing::debug!(project = %sandbox.project_name, "Pulling images");
        reporter.step("pulling images");
        engine.compose(&stack, &["pull"]).await?;
    }

    reporter.step("starting instance containers");
    engine
        .compose(&stack, &["up", "--remove-orphans", "-d"])
        .await
        .context("failed to start the instance")?;

    let statement = create_database_statement(&sandbox.project_name);
    engine
        .exec(DATABASE_CONTAINER, &["/bin/bash", "-c", &statement])
        .await
        .with_context(|| format!("failed to create database {}", sandbox.project_name))?;
    Ok(())
}

/// Stop the instance; with `remove` also delete its containers and volumes.
///
/// # Errors
///
/// Returns an error if compose cannot be spawned or exits unsuccessfully.
pub async fn stop(engine: &impl ComposeRunner, sandbox: &Sandbox, remove: bool) -> Result<()> {
    let args: &[&str] = if remove {
        &["down", "--remove-orphans", "--volumes"]
    } else {
        &["stop"]
    };
    let status = engine
        .compose_interactive(&project_stack(sandbox), args)
        .await?;
    if !status.success() {
        bail!("failed to stop the instance");
    }
    Ok(())
}

/// Show the instance containers.
///
/// # Errors
///
/// Returns an error if compose cannot be spawned.
pub async fn status(engine: &impl ComposeRunner, sandbox: &Sandbox) -> Result<ExitStatus> {
    engine
        .compose_interactive(&project_stack(sandbox), &["ps"])
        .await
}

/// Options of the `logs` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogOptions {
    pub follow: bool,
    pub tail: u32,
    /// Show container output instead of the application log files.
    pub containers: bool,
}

/// Show container logs or tail the application logs in the PHP container.
///
/// # Errors
///
/// Returns an error if the engine cannot be spawned.
pub async fn logs(
    engine: &(impl ComposeRunner + ContainerRuntime),
    sandbox: &Sandbox,
    opts: LogOptions,
) -> Result<ExitStatus> {
    if opts.containers {
        let tail = format!("--tail={}", opts.tail);
        let mut args = vec!["logs", tail.as_str()];
        if opts.follow {
            args.push("-f");
        }
        return engine
            .compose_interactive(&project_stack(sandbox), &args)
            .await;
    }

    let command = log_tail_command(opts.tail, opts.follow);
    engine
        .exec_interactive(&sandbox.php_container(), &["bash", "-c", &command])
        .await
}

/// Shell command tailing the application log files.
#[must_use]
pub fn log_tail_command(tail: u32, follow: bool) -> String {
    let follow = if follow { " -f" } else { "" };
    format!("tail -n -{tail}{follow} {APPLICATION_LOGS}")
}

/// Open an interactive shell in the PHP container.
///
/// # Errors
///
/// Returns an error if the engine cannot be spawned.
pub async fn ssh(engine: &impl ContainerRuntime, sandbox: &Sandbox) -> Result<ExitStatus> {
    engine
        .exec_interactive(&sandbox.php_container(), &["bash"])
        .await
}

/// Run a command (or a shell without one) in the PHP container.
///
/// # Errors
///
/// Returns an error if the engine cannot be spawned.
pub async fn exec(
    engine: &impl ContainerRuntime,
    sandbox: &Sandbox,
    args: &[String],
) -> Result<ExitStatus> {
    let command = shell_command(args);
    let command: Vec<&str> = command.iter().map(String::as_str).collect();
    engine
        .exec_interactive(&sandbox.php_container(), &command)
        .await
}

/// Run Composer in the PHP container.
///
/// # Errors
///
/// Returns an error if the engine cannot be spawned.
pub async fn composer(
    engine: &impl ContainerRuntime,
    sandbox: &Sandbox,
    args: &[String],
) -> Result<ExitStatus> {
    let command = composer_command(args);
    engine
        .exec_interactive(&sandbox.php_container(), &["bash", "-c", &command])
        .await
}

/// `bash` for no arguments, `bash -c "<args joined>"` otherwise.
#[must_use]
pub fn shell_command(args: &[String]) -> Vec<String> {
    let mut command = vec!["bash".to_string()];
    if !args.is_empty() {
        command.push("-c".to_string());
        command.push(args.join(" "));
    }
    command
}

/// Composer invocation with `args` appended.
#[must_use]
pub fn composer_command(args: &[String]) -> String {
    std::iter::once(COMPOSER.to_string())
        .chain(args.iter().cloned())
        .collect::<Vec<_>>()
        .join(" ")
}
