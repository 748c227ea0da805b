//! Integration tests for the s3-sync CLI
//!
//! These tests require a running S3-compatible server and an existing,
//! disposable bucket. Every object in that bucket is deleted.
//!
//! Run with:
//! ```bash
//! export TEST_S3_ENDPOINT=http://localhost:9000
//! export TEST_S3_ACCESS_KEY=accesskey
//! export TEST_S3_SECRET_KEY=secretkey
//! export TEST_S3_BUCKET=s3-sync-test
//! cargo test -p s3-sync --features integration -- --test-threads=1
//! ```

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};

use tempfile::TempDir;

struct TestConfig {
    endpoint: String,
    access_key: String,
    secret_key: String,
    bucket: String,
}

/// Get S3 test configuration from environment
fn get_test_config() -> Option<TestConfig> {
    Some(TestConfig {
        endpoint: std::env::var("TEST_S3_ENDPOINT").ok()?,
        access_key: std::env::var("TEST_S3_ACCESS_KEY").ok()?,
        secret_key: std::env::var("TEST_S3_SECRET_KEY").ok()?,
        bucket: std::env::var("TEST_S3_BUCKET").ok()?,
    })
}

/// Run s3-sync with an isolated config directory
fn run(args: &[&str], config: &TestConfig, config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_s3-sync"))
        .args(args)
        .env("S3_SYNC_CONFIG_DIR", config_dir)
        .env("AWS_ENDPOINT_URL", &config.endpoint)
        .output()
        .expect("Failed to execute s3-sync")
}

/// Store credentials and empty the test bucket
fn setup() -> Option<(TestConfig, TempDir)> {
    let config = get_test_config()?;
    let config_dir = tempfile::tempdir().ok()?;

    let output = run(
        &[
            "configure",
            "--access-key",
            &config.access_key,
            "--secret-key",
            &config.secret_key,
            "--region",
            "us-east-1",
        ],
        &config,
        config_dir.path(),
    );
    if !output.status.success() {
        eprintln!(
            "Failed to configure: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    let _ = run(
        &["delete", &config.bucket, "--force"],
        &config,
        config_dir.path(),
    );
    Some((config, config_dir))
}

fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn json(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "Invalid JSON ({e}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

#[test]
fn test_put_then_get_round_trip() {
    let Some((config, config_dir)) = setup() else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };
    let source = tempfile::tempdir().unwrap();
    write_file(source.path(), "a.txt", "alpha");
    write_file(source.path(), "nested/deep/b.txt", "beta");

    let src = source.path().to_str().unwrap();
    let output = run(
        &["put", src, &config.bucket, "--json"],
        &config,
        config_dir.path(),
    );
    assert!(
        output.status.success(),
        "put failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(json(&output)["transferred"], 2);

    // Everything just uploaded is at least as new locally: nothing to do
    let output = run(
        &["put", src, &config.bucket, "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["transferred"], 0);
    assert_eq!(json(&output)["skipped"], 2);

    let dest = tempfile::tempdir().unwrap();
    let out = dest.path().join("restore");
    let output = run(
        &["get", &config.bucket, out.to_str().unwrap(), "--json"],
        &config,
        config_dir.path(),
    );
    assert!(
        output.status.success(),
        "get failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(json(&output)["transferred"], 2);
    assert_eq!(
        std::fs::read_to_string(out.join("nested/deep/b.txt")).unwrap(),
        "beta"
    );
}

#[test]
fn test_get_skips_newer_local_file() {
    let Some((config, config_dir)) = setup() else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };
    let source = tempfile::tempdir().unwrap();
    write_file(source.path(), "report.txt", "remote");
    let output = run(
        &["put", source.path().to_str().unwrap(), &config.bucket],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());

    let dest = tempfile::tempdir().unwrap();
    write_file(dest.path(), "report.txt", "local edit");
    let file = std::fs::File::options()
        .write(true)
        .open(dest.path().join("report.txt"))
        .unwrap();
    file.set_modified(SystemTime::now() + Duration::from_secs(3600))
        .unwrap();

    let output = run(
        &["get", &config.bucket, dest.path().to_str().unwrap(), "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["skipped"], 1);
    assert_eq!(
        std::fs::read_to_string(dest.path().join("report.txt")).unwrap(),
        "local edit"
    );
}

#[test]
fn test_list_and_delete() {
    let Some((config, config_dir)) = setup() else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };

    // Empty bucket
    let output = run(
        &["list", "-o", &config.bucket, "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["total_objects"], 0);

    let dest = tempfile::tempdir().unwrap();
    let output = run(
        &["get", &config.bucket, dest.path().to_str().unwrap(), "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["transferred"], 0);

    let source = tempfile::tempdir().unwrap();
    for name in ["one.txt", "two.txt", "dir/three.txt"] {
        write_file(source.path(), name, name);
    }
    let output = run(
        &["put", source.path().to_str().unwrap(), &config.bucket],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());

    let output = run(&["list", "-b", "--json"], &config, config_dir.path());
    assert!(output.status.success());
    let buckets = json(&output)["buckets"].clone();
    assert!(
        buckets
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b == config.bucket.as_str())
    );

    let output = run(
        &["list", "-o", &config.bucket, "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(json(&output)["total_objects"], 3);

    let output = run(
        &["delete", &config.bucket, "--force", "--json"],
        &config,
        config_dir.path(),
    );
    assert!(output.status.success());
    let summary = json(&output);
    assert_eq!(summary["deleted_count"], 3);
    assert_eq!(summary["total_count"], 3);

    let output = run(
        &["delete", &config.bucket, "--force"],
        &config,
        config_dir.path(),
    );
    assert_eq!(output.status.code(), Some(5));
}
