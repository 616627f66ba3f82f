//! Shared mock infrastructure for unit tests.
//!
//! Provides a recording container engine, a scripted health probe, an
//! in-memory object store and a collecting progress reporter so each test
//! file doesn't have to re-define the same boilerplate.

#![allow(dead_code, clippy::expect_used, clippy::unwrap_used)]

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::{Result, bail};
use beach_cli::application::ports::{
    CommandRunner, ComposeRunner, ComposeStack, ContainerRuntime, HealthProbe, ObjectStore,
    ProgressReporter,
};
use beach_cli::domain::EnvironmentMap;

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Recorded invocations ─────────────────────────────────────────────────────

/// One call into the mock engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Compose {
        file: String,
        project: Option<String>,
        args: Vec<String>,
        environment: Vec<(String, String)>,
        interactive: bool,
    },
    Exec {
        container: String,
        command: Vec<String>,
        interactive: bool,
    },
    Health(String),
}

impl Call {
    /// Compose arguments of a compose call, `None` otherwise.
    pub fn compose_args(&self) -> Option<Vec<&str>> {
        match self {
            Call::Compose { args, .. } => Some(args.iter().map(String::as_str).collect()),
            _ => None,
        }
    }
}

fn owned(args: &[&str]) -> Vec<String> {
    args.iter().map(ToString::to_string).collect()
}

// ── Mock: container engine ───────────────────────────────────────────────────

/// Container engine that records every call and answers queries from canned
/// data.
#[derive(Default)]
pub struct MockEngine {
    pub calls: RefCell<Vec<Call>>,
    /// Running container IDs per name filter.
    pub running: HashMap<String, Vec<String>>,
    /// IDs returned by `ps -q`.
    pub all_ids: Vec<String>,
    /// Config files label per container ID; missing IDs fail to inspect.
    pub labels: HashMap<String, String>,
    /// Health labels returned in order; the last one repeats.
    pub health: RefCell<VecDeque<String>>,
    /// Exit code of interactive calls.
    pub interactive_exit: i32,
    /// Compose argument lists that fail.
    pub failing_compose: Vec<Vec<String>>,
    /// Make `running_containers` fail.
    pub engine_down: bool,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine on which Local Beach is already up.
    pub fn with_local_beach_running() -> Self {
        let mut engine = Self::new();
        engine
            .running
            .insert("local_beach_nginx".into(), vec!["n1".into()]);
        engine
            .running
            .insert("local_beach_database".into(), vec!["d1".into()]);
        engine
    }

    pub fn with_health(self, labels: &[&str]) -> Self {
        *self.health.borrow_mut() = labels.iter().map(ToString::to_string).collect();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn compose_calls(&self) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                Call::Compose { args, .. } => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn health_checks(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Health(_)))
            .count()
    }

    fn record_compose(&self, stack: &ComposeStack, args: &[&str], interactive: bool) {
        self.calls.borrow_mut().push(Call::Compose {
            file: stack.file.to_string_lossy().into_owned(),
            project: stack.project.clone(),
            args: owned(args),
            environment: stack
                .environment
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            interactive,
        });
    }
}

impl ComposeRunner for MockEngine {
    async fn compose(&self, stack: &ComposeStack, args: &[&str]) -> Result<()> {
        self.record_compose(stack, args, false);
        if self.failing_compose.contains(&owned(args)) {
            bail!("compose {} failed", args.join(" "));
        }
        Ok(())
    }

    async fn compose_interactive(
        &self,
        stack: &ComposeStack,
        args: &[&str],
    ) -> Result<ExitStatus> {
        self.record_compose(stack, args, true);
        Ok(exit_status(self.interactive_exit))
    }
}

impl ContainerRuntime for MockEngine {
    async fn running_containers(&self, name: &str) -> Result<Vec<String>> {
        if self.engine_down {
            bail!("Cannot connect to the Docker daemon");
        }
        Ok(self.running.get(name).cloned().unwrap_or_default())
    }

    async fn running_container_ids(&self) -> Result<Vec<String>> {
        Ok(self.all_ids.clone())
    }

    async fn compose_config_files(&self, id: &str) -> Result<String> {
        match self.labels.get(id) {
            Some(label) => Ok(label.clone()),
            None => bail!("No such object: {id}"),
        }
    }

    async fn exec(&self, container: &str, command: &[&str]) -> Result<()> {
        self.calls.borrow_mut().push(Call::Exec {
            container: container.to_string(),
            command: owned(command),
            interactive: false,
        });
        Ok(())
    }

    async fn exec_interactive(&self, container: &str, command: &[&str]) -> Result<ExitStatus> {
        self.calls.borrow_mut().push(Call::Exec {
            container: container.to_string(),
            command: owned(command),
            interactive: true,
        });
        Ok(exit_status(self.interactive_exit))
    }
}

impl HealthProbe for MockEngine {
    async fn health_status(&self, container: &str) -> Result<String> {
        self.calls
            .borrow_mut()
            .push(Call::Health(container.to_string()));
        let mut health = self.health.borrow_mut();
        let label = if health.len() > 1 {
            health.pop_front()
        } else {
            health.front().cloned()
        };
        Ok(label.unwrap_or_else(|| "healthy".to_string()))
    }
}

// ── Mock: scripted health probe ──────────────────────────────────────────────

/// Health probe returning scripted results in order; the last one repeats.
pub struct ScriptedProbe {
    script: RefCell<VecDeque<Result<String, String>>>,
    pub attempts: RefCell<u32>,
}

impl ScriptedProbe {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: RefCell::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            ),
            attempts: RefCell::new(0),
        }
    }

    /// `n` times `label` followed by `last`.
    pub fn repeat_then(label: &str, n: usize, last: &str) -> Self {
        let mut script: Vec<Result<&str, &str>> = vec![Ok(label); n];
        script.push(Ok(last));
        Self::new(script)
    }

    pub fn attempts(&self) -> u32 {
        *self.attempts.borrow()
    }
}

impl HealthProbe for ScriptedProbe {
    async fn health_status(&self, _container: &str) -> Result<String> {
        *self.attempts.borrow_mut() += 1;
        let mut script = self.script.borrow_mut();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match next.expect("script must not be empty") {
            Ok(label) => Ok(label),
            Err(reason) => bail!("{reason}"),
        }
    }
}

// ── Mock: command runner ─────────────────────────────────────────────────────

/// Runner returning one canned output per program and recording arguments.
#[derive(Default)]
pub struct MockRunner {
    pub outputs: HashMap<String, Output>,
    pub calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl MockRunner {
    pub fn with_output(mut self, program: &str, output: Output) -> Self {
        self.outputs.insert(program.to_string(), output);
        self
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    async fn run(&self, program: &str, args: &[&str], _env: &EnvironmentMap) -> Result<Output> {
        self.calls
            .borrow_mut()
            .push((program.to_string(), owned(args)));
        match self.outputs.get(program) {
            Some(output) => Ok(output.clone()),
            None => bail!("failed to spawn {program}"),
        }
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &EnvironmentMap,
    ) -> Result<ExitStatus> {
        self.run(program, args, env).await.map(|o| o.status)
    }
}

// ── Mock: object store ───────────────────────────────────────────────────────

/// In-memory bucket.
#[derive(Default)]
pub struct MemoryStore {
    pub objects: RefCell<BTreeMap<String, Vec<u8>>>,
    /// Names whose existence check fails.
    pub broken_lookups: BTreeSet<String>,
    /// Names whose transfer fails.
    pub broken_transfers: BTreeSet<String>,
    pub uploads: RefCell<Vec<String>>,
}

impl MemoryStore {
    pub fn with_objects(objects: &[(&str, &[u8])]) -> Self {
        let store = Self::default();
        for (name, content) in objects {
            store
                .objects
                .borrow_mut()
                .insert((*name).to_string(), content.to_vec());
        }
        store
    }

    pub fn uploads(&self) -> Vec<String> {
        self.uploads.borrow().clone()
    }
}

impl ObjectStore for MemoryStore {
    async fn list_objects(&self) -> Result<Vec<String>> {
        Ok(self.objects.borrow().keys().cloned().collect())
    }

    async fn exists(&self, name: &str) -> Result<bool> {
        if self.broken_lookups.contains(name) {
            bail!("lookup of {name} failed");
        }
        Ok(self.objects.borrow().contains_key(name))
    }

    async fn download(&self, name: &str, target: &Path) -> Result<u64> {
        if self.broken_transfers.contains(name) {
            bail!("connection reset");
        }
        let content = self.objects.borrow().get(name).cloned().unwrap_or_default();
        std::fs::write(target, &content)?;
        Ok(content.len() as u64)
    }

    async fn upload(&self, name: &str, source: &Path) -> Result<u64> {
        if self.broken_transfers.contains(name) {
            bail!("connection reset");
        }
        let content = std::fs::read(source)?;
        let size = content.len() as u64;
        self.objects.borrow_mut().insert(name.to_string(), content);
        self.uploads.borrow_mut().push(name.to_string());
        Ok(size)
    }
}

// ── Mock: progress reporter ──────────────────────────────────────────────────

/// Reporter collecting all messages as `"<kind>: <message>"`.
#[derive(Default)]
pub struct CollectingReporter {
    pub messages: RefCell<Vec<String>>,
}

impl CollectingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages
            .borrow()
            .iter()
            .filter_map(|m| m.strip_prefix("warn: ").map(str::to_string))
            .collect()
    }
}

impl ProgressReporter for CollectingReporter {
    fn step(&self, message: &str) {
        self.messages.borrow_mut().push(format!("step: {message}"));
    }

    fn wait(&self, message: &str) {
        self.messages.borrow_mut().push(format!("wait: {message}"));
    }

    fn success(&self, message: &str) {
        self.messages
            .borrow_mut()
            .push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(format!("warn: {message}"));
    }
}
