//! Project domain types and pure helpers.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::environment::EnvironmentMap;
use crate::domain::error::ProjectError;

/// Marker file whose presence identifies a project root.
pub const MARKER_FILE: &str = ".localbeach.docker-compose.yaml";

/// Flow launcher script; its presence without a marker means `beach init` was never run.
pub const FLOW_LAUNCHER: &str = "flow";

/// Environment variable holding the project name.
pub const PROJECT_NAME_VAR: &str = "BEACH_PROJECT_NAME";

/// Top-level domain under which instances are served.
pub const INSTANCE_DOMAIN: &str = "localbeach.net";

/// Location of the persistent resources relative to the project root.
pub const PERSISTENT_RESOURCES_PATH: &str = "Data/Persistent/Resources";

static PROJECT_NAME_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Pattern is a compile-time constant
    Regex::new(r"[^a-zA-Z0-9-]").expect("valid project name filter")
});

/// An activated project: its root, name, and loaded environment.
#[derive(Debug, Clone)]
pub struct Sandbox {
    pub project_name: String,
    pub root: PathBuf,
    pub environment: EnvironmentMap,
}

impl Sandbox {
    /// Build a sandbox from a located root and its loaded environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::ProjectNameMissing`] if `BEACH_PROJECT_NAME`
    /// is absent or empty.
    pub fn new(root: PathBuf, environment: EnvironmentMap) -> Result<Self, ProjectError> {
        let project_name = environment
            .get(PROJECT_NAME_VAR)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or_else(|| ProjectError::ProjectNameMissing { root: root.clone() })?;
        Ok(Self {
            project_name,
            root,
            environment,
        })
    }

    /// The project's compose file.
    #[must_use]
    pub fn compose_file(&self) -> PathBuf {
        self.root.join(MARKER_FILE)
    }

    #[must_use]
    pub fn persistent_resources_path(&self) -> PathBuf {
        self.root.join(PERSISTENT_RESOURCES_PATH)
    }

    /// Name of the PHP container of this project.
    #[must_use]
    pub fn php_container(&self) -> String {
        format!("{}_php", self.project_name)
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}.{INSTANCE_DOMAIN}", self.project_name)
    }
}

/// Reduce a requested project name to `[a-zA-Z0-9-]`.
///
/// # Errors
///
/// Returns [`ProjectError::EmptyProjectName`] if nothing is left.
pub fn sanitize_project_name(requested: &str) -> Result<String, ProjectError> {
    let name = PROJECT_NAME_FILTER
        .replace_all(requested.trim(), "")
        .into_owned();
    if name.is_empty() {
        return Err(ProjectError::EmptyProjectName);
    }
    Ok(name)
}

/// Default project name: the last component of the working directory.
#[must_use]
pub fn default_project_name(cwd: &Path) -> String {
    cwd.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Substitute the project name placeholders of a project template.
#[must_use]
pub fn render_project_template(template: &str, project_name: &str) -> String {
    template
        .replace("${BEACH_PROJECT_NAME_LOWERCASE}", &project_name.to_lowercase())
        .replace("${BEACH_PROJECT_NAME}", project_name)
}
