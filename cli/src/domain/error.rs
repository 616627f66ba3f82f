//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use std::path::PathBuf;

use thiserror::Error;

// ── Project errors ────────────────────────────────────────────────────────────

/// Errors raised while locating and activating a project.
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error(
        "could not find a Local Beach project in {} or any parent directory - run \"beach init\" in your Flow or Neos project",
        .start.display()
    )]
    NotFound { start: PathBuf },

    #[error(
        "found a Flow or Neos installation in {} but no Local Beach configuration - run \"beach init\" to create some",
        .flow_root.display()
    )]
    ConfigurationMissing { flow_root: PathBuf },

    #[error("BEACH_PROJECT_NAME is not set in the environment files of {}", .root.display())]
    ProjectNameMissing { root: PathBuf },

    #[error("the project name is empty, but cannot be")]
    EmptyProjectName,
}

// ── Environment file errors ───────────────────────────────────────────────────

/// Errors raised while parsing `KEY=VALUE` environment files.
#[derive(Debug, Error)]
pub enum EnvFileError {
    #[error("failed loading environment file {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    #[error("malformed line {line_number} in environment file {}: {line:?}", .path.display())]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
    },
}

// ── Readiness errors ──────────────────────────────────────────────────────────

/// Errors raised while waiting for a container to become healthy.
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("timeout waiting for {container} to become healthy after {attempts} attempts")]
    Timeout { container: String, attempts: u32 },

    #[error("failed to check for {container} container health: {reason}")]
    StatusCheck { container: String, reason: String },
}

// ── External process errors ───────────────────────────────────────────────────

/// An external program ran but reported failure.
#[derive(Debug, Error)]
#[error("{program} {args} failed{}{}", exit_suffix(.code), output_suffix(.output))]
pub struct CommandError {
    pub program: String,
    pub args: String,
    pub code: Option<i32>,
    pub output: String,
}

#[allow(clippy::ref_option)]
fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(|| " (terminated by signal)".to_string(), |c| format!(" with exit code {c}"))
}

fn output_suffix(output: &str) -> String {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

// ── Cloud storage credential errors ───────────────────────────────────────────

/// Errors raised while retrieving cloud storage access data from an instance.
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("failed connecting to instance with internal host {host} - {reason}")]
    Connection { host: String, reason: String },

    #[error("could not determine cloud storage bucket name from instance variables")]
    BucketMissing,

    #[error("could not determine cloud storage private key from instance variables")]
    PrivateKeyMissing,

    #[error("failed decoding cloud storage private key")]
    PrivateKeyEncoding,
}

/// Why an object name cannot be placed in the resource layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    #[error("name is too short")]
    TooShort,

    #[error("name does not map to a path below the resources directory")]
    Unsafe,
}
