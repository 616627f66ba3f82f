//! `beach resource-download` / `beach resource-upload`: sync persistent
//! resources with the cloud storage bucket of a Beach instance.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::project::activate_sandbox;
use crate::application::services::resources::{
    self, SyncSummary, UploadOptions, retrieve_access,
};
use crate::domain::{InstanceAddress, Sandbox};
use crate::infra::gcs::GcsObjectStore;

/// Beach instance to sync with.
#[derive(Args)]
pub struct InstanceArgs {
    /// Instance identifier, e.g. `instance-123abc45-def6-7890-abcd-1234567890ab`
    #[arg(long)]
    pub instance: String,

    /// Project namespace, e.g. `beach-project-123abc45-def6-7890-abcd-1234567890ab`
    #[arg(long)]
    pub namespace: String,

    /// Cluster identifier, e.g. `h9acc4`
    #[arg(long)]
    pub cluster: Option<String>,

    /// Bucket to use instead of the one configured for the instance
    #[arg(long)]
    pub bucket: Option<String>,

    /// Local resources directory; defaults to `Data/Persistent/Resources`
    #[arg(long)]
    pub resources_path: Option<PathBuf>,
}

impl InstanceArgs {
    fn address(&self) -> InstanceAddress {
        InstanceAddress {
            instance: self.instance.clone(),
            namespace: self.namespace.clone(),
            cluster: self.cluster.clone(),
        }
    }

    fn resources_path(&self, sandbox: &Sandbox) -> PathBuf {
        self.resources_path
            .clone()
            .unwrap_or_else(|| sandbox.persistent_resources_path())
    }
}

/// Arguments for the resource-download command.
#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub target: InstanceArgs,
}

/// Arguments for the resource-upload command.
#[derive(Args)]
pub struct UploadArgs {
    #[command(flatten)]
    pub target: InstanceArgs,

    /// Upload resources even if they already exist in the bucket
    #[arg(long)]
    pub force: bool,

    /// Skip files whose names sort before this one
    #[arg(long)]
    pub resume_with_file: Option<String>,
}

async fn connect(app: &AppContext, args: &InstanceArgs) -> Result<GcsObjectStore> {
    let mut access = retrieve_access(&app.runner, &args.address()).await?;
    if let Some(bucket) = &args.bucket {
        access.bucket.clone_from(bucket);
    }
    app.output.kv("bucket", &access.bucket);
    GcsObjectStore::new(&access)
}

fn report(app: &AppContext, verb: &str, summary: SyncSummary) -> ExitCode {
    app.output.success(&format!(
        "{verb} {} resources, skipped {}",
        summary.transferred, summary.skipped
    ));
    if summary.failed > 0 {
        app.output
            .warn(&format!("{} resources could not be checked", summary.failed));
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Run `beach resource-download`.
///
/// # Errors
///
/// Returns an error if credentials cannot be retrieved or a transfer fails.
pub async fn download(app: &AppContext, args: &DownloadArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let path = args.target.resources_path(&sandbox);
    let store = connect(app, &args.target).await?;

    let summary = resources::download_resources(&store, &app.fs, &app.reporter(), &path).await?;
    Ok(report(app, "Downloaded", summary))
}

/// Run `beach resource-upload`.
///
/// # Errors
///
/// Returns an error if credentials cannot be retrieved or a transfer fails.
pub async fn upload(app: &AppContext, args: &UploadArgs) -> Result<ExitCode> {
    let sandbox = activate_sandbox(&app.fs, &app.cwd()?)?;
    let path = args.target.resources_path(&sandbox);
    let store = connect(app, &args.target).await?;

    let opts = UploadOptions {
        force: args.force,
        resume_with: args.resume_with_file.as_deref(),
    };
    let summary =
        resources::upload_resources(&store, &app.fs, &app.reporter(), &path, opts).await?;
    Ok(report(app, "Uploaded", summary))
}
