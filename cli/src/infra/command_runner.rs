//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution. Commands run until they exit; there is no
//! timeout.

use std::process::{ExitStatus, Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;
use crate::domain::EnvironmentMap;

/// Production `CommandRunner`: spawns children with the inherited
/// environment plus the variables of the given [`EnvironmentMap`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn command(program: &str, args: &[&str], env: &EnvironmentMap) -> tokio::process::Command {
    let mut cmd = tokio::process::Command::new(program);
    cmd.args(args).envs(env.iter()).kill_on_drop(true);
    cmd
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], env: &EnvironmentMap) -> Result<Output> {
        tracing::debug!(program, args = %args.join(" "), "running command");
        let mut child = command(program, args, env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );
        Ok(Output {
            status: status.with_context(|| format!("waiting for {program}"))?,
            stdout,
            stderr,
        })
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus> {
        tracing::debug!(program, args = %args.join(" "), "running interactive command");
        let mut child = command(program, args, env)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for {program}"))
    }
}
