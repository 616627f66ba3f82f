//! Infrastructure implementation of the container engine port traits.
//!
//! `ContainerCli<R>` routes every engine call (`docker`, or a compatible
//! binary such as `podman`) through a `CommandRunner`.

use std::io::IsTerminal;
use std::process::ExitStatus;

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, ComposeRunner, ComposeStack, ContainerRuntime, HealthProbe,
};
use crate::application::services::local_beach::CONFIG_FILES_LABEL;
use crate::application::services::process::{ensure_success, stdout_lines};
use crate::domain::EnvironmentMap;
use crate::infra::command_runner::TokioCommandRunner;

/// Default container engine binary.
pub const DEFAULT_ENGINE: &str = "docker";

/// Infrastructure adapter for a Docker compatible container engine CLI.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct ContainerCli<R: CommandRunner> {
    runner: R,
    program: String,
    no_env: EnvironmentMap,
}

impl<R: CommandRunner> ContainerCli<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
            no_env: EnvironmentMap::new(),
        }
    }

    /// Binary this adapter invokes.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    async fn capture(&self, args: &[&str]) -> Result<Vec<String>> {
        let output = self.runner.run(&self.program, args, &self.no_env).await?;
        let output = ensure_success(&self.program, args, output)?;
        Ok(stdout_lines(&output))
    }
}

impl ContainerCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(program: &str) -> Self {
        Self::new(TokioCommandRunner::new(), program)
    }
}

impl<R: CommandRunner> ComposeRunner for ContainerCli<R> {
    async fn compose(&self, stack: &ComposeStack, args: &[&str]) -> Result<()> {
        let file = stack.file.to_string_lossy();
        let full = stack.compose_args(&file, args);
        let output = self
            .runner
            .run(&self.program, &full, &stack.environment)
            .await?;
        ensure_success(&self.program, &full, output)?;
        Ok(())
    }

    async fn compose_interactive(
        &self,
        stack: &ComposeStack,
        args: &[&str],
    ) -> Result<ExitStatus> {
        let file = stack.file.to_string_lossy();
        let full = stack.compose_args(&file, args);
        self.runner
            .run_status(&self.program, &full, &stack.environment)
            .await
    }
}

impl<R: CommandRunner> ContainerRuntime for ContainerCli<R> {
    async fn running_containers(&self, name: &str) -> Result<Vec<String>> {
        let filter = format!("name={name}");
        self.capture(&["ps", "--filter", &filter, "--filter", "status=running", "-q"])
            .await
    }

    async fn running_container_ids(&self) -> Result<Vec<String>> {
        self.capture(&["ps", "-q"]).await
    }

    async fn compose_config_files(&self, id: &str) -> Result<String> {
        let format = format!("{{{{index .Config.Labels \"{CONFIG_FILES_LABEL}\"}}}}");
        let lines = self.capture(&["inspect", "-f", &format, id]).await?;
        Ok(lines.into_iter().next().unwrap_or_default())
    }

    async fn exec(&self, container: &str, command: &[&str]) -> Result<()> {
        let mut args = vec!["exec", container];
        args.extend_from_slice(command);
        let output = self.runner.run(&self.program, &args, &self.no_env).await?;
        ensure_success(&self.program, &args, output)?;
        Ok(())
    }

    async fn exec_interactive(&self, container: &str, command: &[&str]) -> Result<ExitStatus> {
        // Allocate a TTY only when attached to one.
        let flags = if std::io::stdin().is_terminal() { "-ti" } else { "-i" };
        let mut args = vec!["exec", flags, container];
        args.extend_from_slice(command);
        self.runner
            .run_status(&self.program, &args, &self.no_env)
            .await
    }
}

impl<R: CommandRunner> HealthProbe for ContainerCli<R> {
    async fn health_status(&self, container: &str) -> Result<String> {
        let lines = self
            .capture(&["inspect", "-f", "{{.State.Health.Status}}", container])
            .await?;
        Ok(lines.into_iter().next().unwrap_or_default())
    }
}
