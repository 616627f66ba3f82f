//! Local Beach lifecycle service with a mocked container engine.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::time::Duration;

use beach_cli::application::services::local_beach::{
    down_all, ensure_running, pause, resume, setup, setup_https,
};
use beach_cli::domain::{LocalBeachLayout, ReadinessError, ReadinessPolicy};
use beach_cli::infra::assets::EmbeddedAssets;
use beach_cli::infra::fs::LocalFs;

use crate::mocks::{Call, CollectingReporter, MockEngine, MockRunner, err_output, ok_output};

const MARKER: &str = ".localbeach.docker-compose.yaml";

fn instant_policy() -> ReadinessPolicy {
    ReadinessPolicy {
        max_attempts: 10,
        interval: Duration::ZERO,
    }
}

fn layout(dir: &Path) -> LocalBeachLayout {
    LocalBeachLayout::under(&dir.join("localbeach"))
}

fn write_project(root: &Path, env: &str) {
    std::fs::create_dir_all(root).expect("create project");
    std::fs::write(root.join(MARKER), "services: {}\n").expect("write marker");
    std::fs::write(root.join(".localbeach.dist.env"), env).expect("write env");
}

// ── setup ────────────────────────────────────────────────────────────────────

#[test]
fn setup_creates_directories_and_renders_compose_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let reporter = CollectingReporter::default();

    setup(&LocalFs, &EmbeddedAssets, &reporter, &layout).expect("setup");

    assert!(layout.certificates.is_dir());
    assert!(layout.database.is_dir());
    let compose = std::fs::read_to_string(layout.compose_file()).expect("compose file");
    assert!(compose.contains(&layout.database.display().to_string()));
    assert!(compose.contains(&layout.certificates.display().to_string()));
    assert!(!compose.contains("{{databasePath}}"));
    assert!(!compose.contains("{{certificatesPath}}"));
}

#[test]
fn setup_honours_custom_folders() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut layout = layout(dir.path());
    layout.database = dir.path().join("elsewhere/db");

    setup(&LocalFs, &EmbeddedAssets, &CollectingReporter::default(), &layout).expect("setup");

    assert!(dir.path().join("elsewhere/db").is_dir());
    let compose = std::fs::read_to_string(layout.compose_file()).expect("compose file");
    assert!(compose.contains(&dir.path().join("elsewhere/db").display().to_string()));
}

// ── ensure_running ───────────────────────────────────────────────────────────

#[tokio::test]
async fn ensure_running_skips_start_when_both_containers_run() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    std::fs::create_dir_all(&layout.base).expect("create base");
    let engine = MockEngine::with_local_beach_running();

    ensure_running(
        &engine,
        &LocalFs,
        &EmbeddedAssets,
        &CollectingReporter::default(),
        &layout,
        instant_policy(),
    )
    .await
    .expect("ensure running");

    assert!(engine.calls().is_empty(), "unexpected calls: {:?}", engine.calls());
}

#[tokio::test]
async fn ensure_running_starts_services_and_waits_for_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let engine = MockEngine::new().with_health(&["starting", "starting", "healthy"]);
    let reporter = CollectingReporter::default();

    ensure_running(
        &engine,
        &LocalFs,
        &EmbeddedAssets,
        &reporter,
        &layout,
        instant_policy(),
    )
    .await
    .expect("ensure running");

    let calls = engine.calls();
    match &calls[0] {
        Call::Compose {
            file,
            project,
            args,
            interactive,
            ..
        } => {
            assert_eq!(file, &layout.compose_file().display().to_string());
            assert_eq!(project.as_deref(), Some("localbeach"));
            assert_eq!(args, &["up", "--remove-orphans", "-d"]);
            assert!(*interactive);
        }
        other => panic!("expected compose up, got {other:?}"),
    }
    assert_eq!(engine.health_checks(), 3);
    assert!(layout.compose_file().is_file(), "missing setup was not run");
    assert!(
        reporter
            .messages()
            .contains(&"wait: waiting for database server".to_string())
    );
}

#[tokio::test]
async fn ensure_running_reports_unreachable_engine() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine {
        engine_down: true,
        ..MockEngine::default()
    };

    let err = ensure_running(
        &engine,
        &LocalFs,
        &EmbeddedAssets,
        &CollectingReporter::default(),
        &layout(dir.path()),
        instant_policy(),
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("maybe the container engine is not running"));
}

#[tokio::test]
async fn ensure_running_fails_when_compose_up_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine {
        interactive_exit: 1,
        ..MockEngine::default()
    };

    let err = ensure_running(
        &engine,
        &LocalFs,
        &EmbeddedAssets,
        &CollectingReporter::default(),
        &layout(dir.path()),
        instant_policy(),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("failed to start Local Beach"));
    assert_eq!(engine.health_checks(), 0);
}

#[tokio::test]
async fn ensure_running_times_out_on_unhealthy_database() {
    let dir = tempfile::tempdir().expect("tempdir");
    let engine = MockEngine::new().with_health(&["unhealthy"]);

    let err = ensure_running(
        &engine,
        &LocalFs,
        &EmbeddedAssets,
        &CollectingReporter::default(),
        &layout(dir.path()),
        instant_policy(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReadinessError>(),
        Some(ReadinessError::Timeout { attempts: 10, .. })
    ));
    assert_eq!(engine.health_checks(), 10);
}

// ── pause / resume ───────────────────────────────────────────────────────────

#[tokio::test]
async fn pause_and_resume_address_both_services() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let engine = MockEngine::new();

    pause(&engine, &layout).await.expect("pause");
    resume(&engine, &layout).await.expect("resume");

    assert_eq!(
        engine.compose_calls(),
        vec![
            vec!["stop", "webserver", "database"],
            vec!["start", "webserver", "database"],
        ]
    );
}

// ── setup_https ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn setup_https_issues_wildcard_certificate_and_restarts_webserver() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let runner = MockRunner::default().with_output("mkcert", ok_output(b""));
    let engine = MockEngine::new();

    setup_https(&runner, &engine, &CollectingReporter::default(), &layout)
        .await
        .expect("setup https");

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].1, vec!["-install"]);
    assert_eq!(
        calls[1].1,
        vec![
            "-cert-file".to_string(),
            layout.certificate_file().display().to_string(),
            "-key-file".to_string(),
            layout.certificate_key_file().display().to_string(),
            "*.localbeach.net".to_string(),
        ]
    );
    assert_eq!(engine.compose_calls(), vec![vec!["restart", "webserver"]]);
}

#[tokio::test]
async fn setup_https_stops_when_mkcert_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let runner =
        MockRunner::default().with_output("mkcert", err_output(1, b"ERROR: no trust store\n"));
    let engine = MockEngine::new();

    let err = setup_https(
        &runner,
        &engine,
        &CollectingReporter::default(),
        &layout(dir.path()),
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("no trust store"));
    assert!(engine.calls().is_empty());
}

#[tokio::test]
async fn setup_https_without_mkcert_suggests_installing_it() {
    let dir = tempfile::tempdir().expect("tempdir");

    let err = setup_https(
        &MockRunner::default(),
        &MockEngine::new(),
        &CollectingReporter::default(),
        &layout(dir.path()),
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("is it installed?"));
}

// ── down_all ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn down_all_stops_each_instance_once_then_local_beach() {
    let dir = tempfile::tempdir().expect("tempdir");
    let layout = layout(dir.path());
    let shop = dir.path().join("shop");
    let blog = dir.path().join("blog");
    write_project(&shop, "BEACH_PROJECT_NAME=shop\n");
    write_project(&blog, "BEACH_PROJECT_NAME=blog\n");

    let mut engine = MockEngine::new();
    engine.all_ids = ["a", "b", "gone", "c", "foreign"]
        .iter()
        .map(ToString::to_string)
        .collect();
    let shop_label = shop.join(MARKER).display().to_string();
    let blog_label = format!("{},/tmp/override.yaml", blog.join(MARKER).display());
    engine.labels.insert("a".into(), shop_label.clone());
    engine.labels.insert("b".into(), shop_label);
    engine.labels.insert("c".into(), blog_label);
    engine.labels.insert("foreign".into(), "<no value>".into());

    down_all(&engine, &LocalFs, &CollectingReporter::default(), &layout)
        .await
        .expect("down all");

    let composes: Vec<(String, Option<String>, Vec<(String, String)>)> = engine
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::Compose {
                file,
                project,
                environment,
                args,
                ..
            } => {
                assert_eq!(args, vec!["down", "-v"]);
                Some((file, project, environment))
            }
            _ => None,
        })
        .collect();

    assert_eq!(composes.len(), 3);
    assert_eq!(composes[0].0, shop.join(MARKER).display().to_string());
    assert_eq!(
        composes[0].2,
        vec![("BEACH_PROJECT_NAME".to_string(), "shop".to_string())]
    );
    assert_eq!(composes[1].0, blog.join(MARKER).display().to_string());
    assert_eq!(composes[2].0, layout.compose_file().display().to_string());
    assert_eq!(composes[2].1.as_deref(), Some("localbeach"));
}

#[tokio::test]
async fn down_all_continues_with_empty_environment_on_malformed_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let shop = dir.path().join("shop");
    write_project(&shop, "not an assignment\n");

    let mut engine = MockEngine::new();
    engine.all_ids = vec!["a".into()];
    engine
        .labels
        .insert("a".into(), shop.join(MARKER).display().to_string());
    let reporter = CollectingReporter::default();

    down_all(&engine, &LocalFs, &reporter, &layout(dir.path()))
        .await
        .expect("down all");

    assert_eq!(engine.compose_calls().len(), 2);
    assert_eq!(reporter.warnings().len(), 1);
    assert!(reporter.warnings()[0].contains("malformed line"));
}

#[tokio::test]
async fn down_all_skips_roots_without_marker() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut engine = MockEngine::new();
    engine.all_ids = vec!["a".into()];
    engine.labels.insert(
        "a".into(),
        dir.path().join("deleted").join(MARKER).display().to_string(),
    );

    down_all(
        &engine,
        &LocalFs,
        &CollectingReporter::default(),
        &layout(dir.path()),
    )
    .await
    .expect("down all");

    assert_eq!(engine.compose_calls(), vec![vec!["down", "-v"]]);
}
