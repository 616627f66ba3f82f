//! Persistent resource synchronization between a project and the cloud
//! storage bucket of a Beach instance.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::application::ports::{CommandRunner, LocalFs, ObjectStore, ProgressReporter};
use crate::domain::resources::CREDENTIALS_QUERY;
use crate::domain::{
    CloudStorageAccess, CredentialsError, EnvironmentMap, InstanceAddress, ResourceNameError,
    parse_cloud_storage_access, resource_directory_for_hash,
};

/// Counts reported at the end of a sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncSummary {
    pub transferred: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Ask the instance for its cloud storage bucket and service account key.
///
/// # Errors
///
/// Returns a [`CredentialsError`] if the instance cannot be reached or does
/// not expose complete storage credentials.
pub async fn retrieve_access(
    runner: &impl CommandRunner,
    address: &InstanceAddress,
) -> Result<CloudStorageAccess> {
    let jump = address.jump_host();
    let host = address.internal_host();
    let args = ["-J", jump.as_str(), host.as_str(), "/bin/bash", "-c", CREDENTIALS_QUERY];

    tracing::debug!(%host, %jump, "retrieving cloud storage credentials");
    let output = runner
        .run("ssh", &args, &EnvironmentMap::new())
        .await
        .map_err(|e| CredentialsError::Connection {
            host: host.clone(),
            reason: format!("{e:#}"),
        })?;
    if !output.status.success() {
        return Err(CredentialsError::Connection {
            host,
            reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into());
    }

    let access = parse_cloud_storage_access(&String::from_utf8_lossy(&output.stdout))?;
    tracing::debug!(bucket = %access.bucket, "retrieved cloud storage credentials");
    Ok(access)
}

fn ensure_resources_path(fs: &impl LocalFs, path: &Path) -> Result<()> {
    if !fs.is_dir(path) {
        bail!("the resources path {} does not exist", path.display());
    }
    Ok(())
}

/// Download every object of the bucket into the sharded resource layout.
///
/// Existing files are overwritten. Objects whose names are too short to
/// shard, or would land outside `resources_path`, are reported and skipped.
///
/// # Errors
///
/// Returns an error if the resources path does not exist, the bucket cannot
/// be listed, or a transfer fails.
pub async fn download_resources(
    store: &impl ObjectStore,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    resources_path: &Path,
) -> Result<SyncSummary> {
    ensure_resources_path(fs, resources_path)?;

    let mut summary = SyncSummary::default();
    let names = store
        .list_objects()
        .await
        .context("failed to list objects in bucket")?;

    for name in names {
        let target = match download_target(resources_path, &name) {
            Ok(target) => target,
            Err(reason) => {
                reporter.warn(&format!("skipping {name}: {reason}"));
                summary.skipped += 1;
                continue;
            }
        };
        if let Some(dir) = target.parent() {
            fs.create_dir_all(dir)
                .with_context(|| format!("failed to create directory {}", dir.display()))?;
        }
        let bytes = store
            .download(&name, &target)
            .await
            .with_context(|| format!("failed to download {name}"))?;
        tracing::debug!(%name, bytes, "Downloaded");
        reporter.step(&format!("downloaded {name}"));
        summary.transferred += 1;
    }
    Ok(summary)
}

/// Local path of an object: `<resources>/<hash directory>/<basename>`.
///
/// # Errors
///
/// Returns a [`ResourceNameError`] if the name cannot be sharded or the
/// resulting path would not stay below `resources_path`.
pub fn download_target(resources_path: &Path, name: &str) -> Result<PathBuf, ResourceNameError> {
    let dir = resource_directory_for_hash(name)?;
    let basename = Path::new(name.rsplit('/').next().unwrap_or(name));
    let relative = dir.join(basename);
    if !relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(ResourceNameError::Unsafe);
    }
    let target = resources_path.join(relative);
    if !target.starts_with(resources_path) {
        return Err(ResourceNameError::Unsafe);
    }
    Ok(target)
}

/// Options of an upload run.
#[derive(Debug, Default, Clone, Copy)]
pub struct UploadOptions<'a> {
    /// Upload even if the object already exists.
    pub force: bool,
    /// Skip files whose names sort before this one.
    pub resume_with: Option<&'a str>,
}

/// Upload every file below `resources_path`, named by its basename.
///
/// Failing existence checks are reported and skipped; failing transfers
/// abort the run.
///
/// # Errors
///
/// Returns an error if the resources path does not exist or cannot be
/// listed, or a transfer fails.
pub async fn upload_resources(
    store: &impl ObjectStore,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    resources_path: &Path,
    opts: UploadOptions<'_>,
) -> Result<SyncSummary> {
    ensure_resources_path(fs, resources_path)?;

    let mut summary = SyncSummary::default();
    let files = fs
        .list_files(resources_path)
        .with_context(|| format!("failed to list {}", resources_path.display()))?;

    for path in files {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        if opts.resume_with.is_some_and(|resume| name.as_str() < resume) {
            tracing::debug!(%name, "Skipped before resume point");
            summary.skipped += 1;
            continue;
        }

        if !opts.force {
            match store.exists(&name).await {
                Ok(true) => {
                    tracing::debug!(%name, "Skipped, already exists");
                    summary.skipped += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    reporter.warn(&format!("failed to look up {name}: {e:#}"));
                    summary.failed += 1;
                    continue;
                }
            }
        }

        let bytes = store
            .upload(&name, &path)
            .await
            .with_context(|| format!("failed to upload {}", path.display()))?;
        tracing::debug!(%name, bytes, "Uploaded");
        reporter.step(&format!("uploaded {name}"));
        summary.transferred += 1;
    }
    Ok(summary)
}
