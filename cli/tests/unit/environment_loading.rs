//! Environment file loading in precedence order.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use beach_cli::application::services::project::load_environment;
use beach_cli::domain::EnvFileError;
use beach_cli::infra::fs::LocalFs;

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).expect("write env file");
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), ".localbeach.dist.env", "A=1\n# comment\n\nB=2\n");

    let env = load_environment(&LocalFs, dir.path()).expect("environment");

    assert_eq!(env.len(), 2);
    assert_eq!(env.get("A"), Some("1"));
    assert_eq!(env.get("B"), Some("2"));
}

#[test]
fn later_files_override_earlier_ones() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), ".localbeach.dist.env", "A=dist\nB=dist\nC=dist\n");
    write(dir.path(), ".env", "B=app\nC=app\n");
    write(dir.path(), ".localbeach.env", "C=local\n");

    let env = load_environment(&LocalFs, dir.path()).expect("environment");

    assert_eq!(env.get("A"), Some("dist"));
    assert_eq!(env.get("B"), Some("app"));
    assert_eq!(env.get("C"), Some("local"));
}

#[test]
fn missing_files_yield_empty_environment() {
    let dir = tempfile::tempdir().expect("tempdir");

    let env = load_environment(&LocalFs, dir.path()).expect("environment");
    assert!(env.is_empty());
}

#[test]
fn malformed_line_aborts_the_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    write(dir.path(), ".localbeach.dist.env", "A=1\n");
    write(dir.path(), ".env", "B=2\nthis is not an assignment\n");

    let err = load_environment(&LocalFs, dir.path()).unwrap_err();

    match err {
        EnvFileError::MalformedLine {
            path, line_number, ..
        } => {
            assert_eq!(path, dir.path().join(".env"));
            assert_eq!(line_number, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A directory where a file is expected exists but cannot be read.
    std::fs::create_dir(dir.path().join(".env")).expect("create dir");

    let err = load_environment(&LocalFs, dir.path()).unwrap_err();
    assert!(matches!(err, EnvFileError::Read { .. }));
}
