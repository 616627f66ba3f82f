//! Project Locator: finds the project root, loads its environment files and
//! activates the sandbox every project command runs in.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{AssetSource, LocalFs, ProgressReporter};
use crate::domain::project::{FLOW_LAUNCHER, render_project_template};
use crate::domain::{
    ENV_FILES, EnvFileError, EnvironmentMap, MARKER_FILE, ProjectError, Sandbox, parse_env_file,
};

/// Find the nearest directory, starting at `start` itself, that contains the
/// project marker file.
///
/// # Errors
///
/// Returns [`ProjectError::ConfigurationMissing`] if no marker exists but a
/// visited directory holds a Flow launcher, [`ProjectError::NotFound`]
/// otherwise.
pub fn locate_project_root(fs: &impl LocalFs, start: &Path) -> Result<PathBuf, ProjectError> {
    let mut flow_root: Option<PathBuf> = None;
    let mut cursor = Some(start);

    while let Some(dir) = cursor {
        if fs.exists(&dir.join(MARKER_FILE)) {
            return Ok(dir.to_path_buf());
        }
        if flow_root.is_none() && fs.exists(&dir.join(FLOW_LAUNCHER)) {
            flow_root = Some(dir.to_path_buf());
        }
        cursor = dir.parent();
    }

    Err(match flow_root {
        Some(flow_root) => ProjectError::ConfigurationMissing { flow_root },
        None => ProjectError::NotFound {
            start: start.to_path_buf(),
        },
    })
}

/// Load the environment files of a project root in precedence order.
///
/// Missing files are skipped; later files override earlier ones.
///
/// # Errors
///
/// Returns an [`EnvFileError`] if an existing file cannot be read or
/// contains a malformed line. Nothing is returned from a partial load.
pub fn load_environment(fs: &impl LocalFs, root: &Path) -> Result<EnvironmentMap, EnvFileError> {
    let mut environment = EnvironmentMap::new();
    for name in ENV_FILES {
        let path = root.join(name);
        if !fs.exists(&path) {
            continue;
        }
        let source = fs.read_to_string(&path).map_err(|e| EnvFileError::Read {
            path: path.clone(),
            reason: format!("{e:#}"),
        })?;
        environment.apply(parse_env_file(&path, &source)?);
    }
    Ok(environment)
}

/// Build the sandbox of an already known project root.
///
/// # Errors
///
/// Returns an error if the environment cannot be loaded or the project name
/// is missing.
pub fn open_sandbox(fs: &impl LocalFs, root: PathBuf) -> Result<Sandbox> {
    let environment = load_environment(fs, &root)?;
    tracing::debug!(root = %root.display(), variables = environment.len(), "loaded project environment");
    Ok(Sandbox::new(root, environment)?)
}

/// Locate the project containing `cwd` and activate its sandbox.
///
/// # Errors
///
/// Returns an error if no project is found, its environment files are
/// malformed, or the project name is missing.
pub fn activate_sandbox(fs: &impl LocalFs, cwd: &Path) -> Result<Sandbox> {
    let root = locate_project_root(fs, cwd)?;
    open_sandbox(fs, root)
}

// ── Project initialization ────────────────────────────────────────────────────

/// A file written by `init`.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFile {
    /// Name of the embedded template.
    pub asset: &'static str,
    /// Target path relative to the project root.
    pub target: &'static str,
    /// Whether the project name placeholders are substituted.
    pub render: bool,
}

/// Files written by `init`, in order.
pub const PROJECT_FILES: &[ProjectFile] = &[
    ProjectFile {
        asset: "project/.localbeach.docker-compose.yaml",
        target: MARKER_FILE,
        render: false,
    },
    ProjectFile {
        asset: "project/Settings.yaml",
        target: "Configuration/Development/Beach/Settings.yaml",
        render: false,
    },
    ProjectFile {
        asset: "project/.localbeach.dist.env",
        target: ".localbeach.dist.env",
        render: true,
    },
];

/// Project files below `dir` that `init` would overwrite.
#[must_use]
pub fn existing_project_files(fs: &impl LocalFs, dir: &Path) -> Vec<PathBuf> {
    PROJECT_FILES
        .iter()
        .map(|file| dir.join(file.target))
        .filter(|path| fs.exists(path))
        .collect()
}

/// Write the project configuration files for `project_name` into `dir`.
///
/// # Errors
///
/// Returns an error if an asset is missing or a file cannot be written.
pub fn init_project(
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    dir: &Path,
    project_name: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(PROJECT_FILES.len());
    for file in PROJECT_FILES {
        let template = assets.get_asset(file.asset)?;
        let content = if file.render {
            render_project_template(template, project_name)
        } else {
            template.to_string()
        };
        let path = dir.join(file.target);
        if let Some(parent) = path.parent() {
            fs.create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs.write(&path, &content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        reporter.step(&format!("created {}", file.target));
        written.push(path);
    }
    Ok(written)
}
