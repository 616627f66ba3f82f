//! Environment file parsing and the explicit environment map handed to
//! external processes.
//!
//! Pure functions only: the caller reads file contents and passes them in.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::error::EnvFileError;

/// Candidate environment files, in the order they are applied.
///
/// Later files overwrite keys set by earlier ones: distributed defaults
/// first, then the application `.env`, then developer-local overrides.
pub const ENV_FILES: &[&str] = &[".localbeach.dist.env", ".env", ".localbeach.env"];

/// Key-value configuration passed explicitly to spawned processes.
///
/// The process-global environment is never mutated; every child process
/// receives these variables on top of the inherited environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentMap {
    vars: BTreeMap<String, String>,
}

impl EnvironmentMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply parsed assignments in order; the last assignment of a name wins.
    pub fn apply(&mut self, assignments: Vec<(String, String)>) {
        for (name, value) in assignments {
            self.set(name, value);
        }
    }
}

/// Parse the contents of a `KEY=VALUE` environment file.
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
/// Each remaining line is split at the first `=`. Values are taken verbatim
/// (no quote stripping, no interpolation).
///
/// # Errors
///
/// Returns [`EnvFileError::MalformedLine`] for the first line that has no
/// `=` or an empty name. `path` is only used for the error message.
pub fn parse_env_file(path: &Path, source: &str) -> Result<Vec<(String, String)>, EnvFileError> {
    let mut assignments = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            return Err(malformed(path, index, line));
        };
        if name.is_empty() {
            return Err(malformed(path, index, line));
        }
        assignments.push((name.to_string(), value.to_string()));
    }
    Ok(assignments)
}

fn malformed(path: &Path, index: usize, line: &str) -> EnvFileError {
    EnvFileError::MalformedLine {
        path: path.to_path_buf(),
        line_number: index + 1,
        line: line.to_string(),
    }
}
