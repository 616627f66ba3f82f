//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};

use anyhow::Result;

use crate::domain::EnvironmentMap;

// ── Value Types ───────────────────────────────────────────────────────────────

/// A compose stack: the compose file, an optional project name and the
/// environment its services are interpolated with.
#[derive(Debug, Clone)]
pub struct ComposeStack {
    /// Path to the compose file passed with `-f`.
    pub file: PathBuf,
    /// Compose project name passed with `-p`, if any.
    pub project: Option<String>,
    /// Variables set on every compose invocation of this stack.
    pub environment: EnvironmentMap,
}

impl ComposeStack {
    /// Build the argument list `compose [-p <project>] -f <file> <args…>`.
    #[must_use]
    pub fn compose_args<'a>(&'a self, file: &'a str, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = vec!["compose"];
        if let Some(project) = &self.project {
            full.push("-p");
            full.push(project);
        }
        full.push("-f");
        full.push(file);
        full.extend_from_slice(args);
        full
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
///
/// `env` is applied on top of the inherited environment of every child.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    async fn run(&self, program: &str, args: &[&str], env: &EnvironmentMap) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus>;
}

// ── Container Engine Ports ────────────────────────────────────────────────────

/// Compose operations on a stack.
#[allow(async_fn_in_trait)]
pub trait ComposeRunner {
    /// Run `compose … <args>` with captured output.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the captured output if compose fails.
    async fn compose(&self, stack: &ComposeStack, args: &[&str]) -> Result<()>;
    /// Run `compose … <args>` attached to the terminal.
    async fn compose_interactive(&self, stack: &ComposeStack, args: &[&str])
    -> Result<ExitStatus>;
}

/// Container queries and execution.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// IDs of running containers whose name matches `name`.
    async fn running_containers(&self, name: &str) -> Result<Vec<String>>;
    /// IDs of all running containers.
    async fn running_container_ids(&self) -> Result<Vec<String>>;
    /// Value of the compose configuration files label of a container.
    async fn compose_config_files(&self, id: &str) -> Result<String>;
    /// Execute a command inside a container with captured output.
    async fn exec(&self, container: &str, command: &[&str]) -> Result<()>;
    /// Execute a command inside a container with a TTY attached.
    async fn exec_interactive(&self, container: &str, command: &[&str]) -> Result<ExitStatus>;
}

/// Abstracts container health probing so the readiness poller can be tested.
#[allow(async_fn_in_trait)]
pub trait HealthProbe {
    /// Raw health label of a container (e.g. `"starting"`, `"healthy"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the status query itself fails.
    async fn health_status(&self, container: &str) -> Result<String>;
}

/// Composite trait: any type implementing all three sub-traits is a `ContainerEngine`.
pub trait ContainerEngine: ComposeRunner + ContainerRuntime + HealthProbe {}

/// Blanket implementation: any type implementing all three sub-traits is a `ContainerEngine`.
impl<T> ContainerEngine for T where T: ComposeRunner + ContainerRuntime + HealthProbe {}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Show that the service is waiting; ended by the next message.
    fn wait(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts local filesystem operations.
pub trait LocalFs {
    /// Whether `path` exists. Stat errors count as "does not exist".
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn write(&self, path: &Path, content: &str) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// All regular files below `dir`, recursively, sorted by path.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Abstracts access to the templates compiled into the binary.
pub trait AssetSource {
    /// Get the contents of a single embedded asset.
    ///
    /// # Errors
    ///
    /// Returns an error if no asset with the given `name` exists.
    fn get_asset(&self, name: &str) -> Result<&'static str>;
}

// ── Object Storage Port ───────────────────────────────────────────────────────

/// Abstracts a cloud storage bucket so resource sync can be tested without
/// network access.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Names of all objects in the bucket.
    async fn list_objects(&self) -> Result<Vec<String>>;
    /// Whether an object with `name` exists.
    async fn exists(&self, name: &str) -> Result<bool>;
    /// Download object `name` to `target`, returning the number of bytes written.
    async fn download(&self, name: &str, target: &Path) -> Result<u64>;
    /// Upload `source` as object `name`, returning the number of bytes sent.
    async fn upload(&self, name: &str, source: &Path) -> Result<u64>;
}
