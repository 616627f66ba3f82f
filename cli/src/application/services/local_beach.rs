//! Local Beach lifecycle: setup, ensure running, pause, resume, HTTPS and
//! shutting everything down.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::application::ports::{
    AssetSource, CommandRunner, ComposeRunner, ComposeStack, ContainerEngine, ContainerRuntime,
    LocalFs, ProgressReporter,
};
use crate::application::services::process::ensure_success;
use crate::application::services::project::load_environment;
use crate::application::services::readiness::wait_until_healthy;
use crate::domain::local_beach::{
    CERTIFICATE_HOSTS, COMPOSE_PROJECT, DATABASE_CONTAINER, NGINX_CONTAINER, SERVICES,
    WEBSERVER_SERVICE,
};
use crate::domain::{EnvironmentMap, LocalBeachLayout, MARKER_FILE, ReadinessPolicy};

/// Embedded template of the shared compose file.
pub const COMPOSE_TEMPLATE: &str = "local-beach/compose.yaml";

/// Container label listing the compose files a container was created from.
pub const CONFIG_FILES_LABEL: &str = "com.docker.compose.project.config_files";

/// The shared compose stack of a Local Beach installation.
#[must_use]
pub fn base_stack(layout: &LocalBeachLayout) -> ComposeStack {
    ComposeStack {
        file: layout.compose_file(),
        project: Some(COMPOSE_PROJECT.to_string()),
        environment: EnvironmentMap::new(),
    }
}

/// Create the Local Beach directories and render the shared compose file.
///
/// # Errors
///
/// Returns an error if a directory or the compose file cannot be written.
pub fn setup(
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    layout: &LocalBeachLayout,
) -> Result<()> {
    for dir in [&layout.base, &layout.certificates, &layout.database] {
        fs.create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    write_compose_file(fs, assets, layout)?;
    reporter.success(&format!("set up Local Beach in {}", layout.base.display()));
    Ok(())
}

fn write_compose_file(
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    layout: &LocalBeachLayout,
) -> Result<()> {
    let template = assets.get_asset(COMPOSE_TEMPLATE)?;
    let path = layout.compose_file();
    fs.write(&path, &layout.render_compose_file(template))
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Make sure the shared webserver and database are up and the database is
/// healthy, starting them if needed.
///
/// # Errors
///
/// Returns an error if the container engine cannot be queried, the services
/// fail to start, or the database does not become healthy in time.
pub async fn ensure_running(
    engine: &impl ContainerEngine,
    fs: &impl LocalFs,
    assets: &impl AssetSource,
    reporter: &impl ProgressReporter,
    layout: &LocalBeachLayout,
    policy: ReadinessPolicy,
) -> Result<()> {
    if !fs.is_dir(&layout.base) {
        setup(fs, assets, reporter, layout)?;
    }

    let nginx = running(engine, NGINX_CONTAINER).await?;
    let database = running(engine, DATABASE_CONTAINER).await?;
    if nginx && database {
        tracing::debug!("Local Beach is already running");
        return Ok(());
    }

    write_compose_file(fs, assets, layout)?;
    reporter.step("starting reverse proxy and database server");
    let status = engine
        .compose_interactive(&base_stack(layout), &["up", "--remove-orphans", "-d"])
        .await?;
    if !status.success() {
        bail!("failed to start Local Beach");
    }

    reporter.wait("waiting for database server");
    wait_until_healthy(engine, DATABASE_CONTAINER, policy).await?;
    reporter.success("Local Beach is running");
    Ok(())
}

async fn running(engine: &impl ContainerRuntime, container: &str) -> Result<bool> {
    let ids = engine.running_containers(container).await.with_context(|| {
        format!("failed to check for {container} container, maybe the container engine is not running")
    })?;
    Ok(!ids.is_empty())
}

/// Stop the shared services without removing them.
///
/// # Errors
///
/// Returns an error if compose fails.
pub async fn pause(engine: &impl ComposeRunner, layout: &LocalBeachLayout) -> Result<()> {
    let mut args = vec!["stop"];
    args.extend_from_slice(SERVICES);
    engine.compose(&base_stack(layout), &args).await
}

/// Start previously paused shared services.
///
/// # Errors
///
/// Returns an error if compose fails.
pub async fn resume(engine: &impl ComposeRunner, layout: &LocalBeachLayout) -> Result<()> {
    let mut args = vec!["start"];
    args.extend_from_slice(SERVICES);
    engine.compose(&base_stack(layout), &args).await
}

/// Install the local CA and issue the wildcard certificate, then restart the
/// webserver so it picks the certificate up.
///
/// # Errors
///
/// Returns an error if `mkcert` fails or the webserver cannot be restarted.
pub async fn setup_https(
    runner: &impl CommandRunner,
    engine: &impl ComposeRunner,
    reporter: &impl ProgressReporter,
    layout: &LocalBeachLayout,
) -> Result<()> {
    let env = EnvironmentMap::new();

    let install = ["-install"];
    let output = runner
        .run("mkcert", &install, &env)
        .await
        .context("failed to run mkcert, is it installed?")?;
    ensure_success("mkcert", &install, output)?;
    reporter.step("installed local certificate authority");

    let cert = layout.certificate_file().to_string_lossy().into_owned();
    let key = layout.certificate_key_file().to_string_lossy().into_owned();
    let issue: [&str; 5] = ["-cert-file", &cert, "-key-file", &key, CERTIFICATE_HOSTS];
    let output = runner.run("mkcert", &issue, &env).await?;
    ensure_success("mkcert", &issue, output)?;
    reporter.step(&format!("issued certificate for {CERTIFICATE_HOSTS}"));

    engine
        .compose(&base_stack(layout), &["restart", WEBSERVER_SERVICE])
        .await?;
    reporter.success("HTTPS is set up");
    Ok(())
}

// ── Shutting down everything ──────────────────────────────────────────────────

/// Roots of all projects with running containers, in discovery order and
/// without duplicates.
///
/// Containers that disappear while being inspected are skipped.
///
/// # Errors
///
/// Returns an error if running containers cannot be listed.
pub async fn discover_instance_roots(
    engine: &impl ContainerRuntime,
    fs: &impl LocalFs,
) -> Result<Vec<PathBuf>> {
    let ids = engine
        .running_container_ids()
        .await
        .context("failed to list running containers")?;

    let mut roots: Vec<PathBuf> = Vec::new();
    for id in ids {
        let label = match engine.compose_config_files(&id).await {
            Ok(label) => label,
            Err(e) => {
                tracing::debug!(container = %id, error = %format!("{e:#}"), "skipped container");
                continue;
            }
        };
        let Some(root) = instance_root_from_label(&label) else {
            continue;
        };
        if fs.exists(&root.join(MARKER_FILE)) && !roots.contains(&root) {
            roots.push(root);
        }
    }
    Ok(roots)
}

/// Directory of the first compose file named in a config files label.
#[must_use]
pub fn instance_root_from_label(label: &str) -> Option<PathBuf> {
    let first = label.trim().split(',').next()?.trim();
    if first.is_empty() || first == "<no value>" {
        return None;
    }
    Path::new(first).parent().map(Path::to_path_buf)
}

/// Take down every running project instance, then Local Beach itself.
///
/// # Errors
///
/// Returns an error if containers cannot be listed or compose fails.
pub async fn down_all(
    engine: &impl ContainerEngine,
    fs: &impl LocalFs,
    reporter: &impl ProgressReporter,
    layout: &LocalBeachLayout,
) -> Result<()> {
    for root in discover_instance_roots(engine, fs).await? {
        let environment = match load_environment(fs, &root) {
            Ok(environment) => environment,
            Err(e) => {
                reporter.warn(&format!("{e}, stopping without it"));
                EnvironmentMap::new()
            }
        };
        let stack = ComposeStack {
            file: root.join(MARKER_FILE),
            project: None,
            environment,
        };
        reporter.step(&format!("stopping instance in {}", root.display()));
        engine.compose(&stack, &["down", "-v"]).await?;
    }

    reporter.step("stopping Local Beach");
    engine.compose(&base_stack(layout), &["down", "-v"]).await?;
    reporter.success("all instances and Local Beach are stopped");
    Ok(())
}
