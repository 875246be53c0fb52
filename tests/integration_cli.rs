// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the `gitarchive` binary.
//!
//! Each test runs in its own temporary working directory so no local
//! `gitarchive.toml` is picked up.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn gitarchive(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gitarchive"))
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run gitarchive")
}

fn git(args: &[&str], cwd: &Path) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {} failed", args.join(" "));
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Temp dir holding `data/` with one file and an initialized `repo/`.
fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    let data = temp.path().join("data");
    fs::create_dir(&data).unwrap();
    fs::write(data.join("report.txt"), "ok").unwrap();

    let repo = temp.path().join("repo");
    fs::create_dir(&repo).unwrap();
    git(&["init", "--quiet"], &repo);
    git(&["config", "user.name", "Test"], &repo);
    git(&["config", "user.email", "test@test.com"], &repo);
    git(&["config", "tag.gpgsign", "false"], &repo);
    temp
}

const TEMPLATE_ARGS: [&str; 12] = [
    "--branch-name",
    "{machine}",
    "--tag-name",
    "{machine}/{tag_number}",
    "--commit-msg-subject",
    "Results for {machine}",
    "--commit-msg-body",
    "",
    "--tag-msg-subject",
    "Run {tag_number} on {machine}",
    "-k",
    "machine=qemux86",
];

#[test]
fn version_prints_package_version() {
    let temp = TempDir::new().unwrap();
    let output = gitarchive(&["version"], temp.path());
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn archive_prints_commit_id() {
    let temp = workspace();
    let mut args = vec!["archive", "data", "--git-dir", "repo"];
    args.extend(TEMPLATE_ARGS);

    let output = gitarchive(&args, temp.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let repo = temp.path().join("repo");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), git(&["rev-parse", "qemux86"], &repo));
    assert_eq!(git(&["tag", "--list"], &repo), "qemux86/0");
    assert_eq!(
        git(&["log", "-1", "--format=%B", "qemux86"], &repo),
        "Results for qemux86"
    );
}

#[test]
fn archive_json_output() {
    let temp = workspace();
    let mut args = vec!["archive", "data", "--git-dir", "repo", "--no-tag", "--json"];
    args.extend(TEMPLATE_ARGS);

    let output = gitarchive(&args, temp.path());
    assert!(output.status.success());

    let outcome: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(outcome["branch"], "qemux86");
    assert_eq!(outcome["tag"], serde_json::Value::Null);
    assert_eq!(outcome["pushed"], false);
}

#[test]
fn config_file_supplies_defaults() {
    let temp = workspace();
    fs::write(
        temp.path().join("gitarchive.toml"),
        r#"
        [archive]
        git_dir = "repo"
        branch_name = "{machine}"
        no_tag = true
        commit_msg_subject = "Results for {machine}"
        commit_msg_body = ""

        [keywords]
        machine = "genericx86"
        "#,
    )
    .unwrap();

    let output = gitarchive(&["archive", "data"], temp.path());
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!git(&["rev-parse", "genericx86"], &temp.path().join("repo")).is_empty());
}

#[test]
fn missing_git_dir_exits_with_error() {
    let temp = workspace();
    let output = gitarchive(&["archive", "data"], temp.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: missing required config key 'git_dir'"), "{stderr}");
}

#[test]
fn unknown_keyword_exits_with_error() {
    let temp = workspace();
    let output = gitarchive(
        &["archive", "data", "--git-dir", "repo", "--branch-name", "{nope}"],
        temp.path(),
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown field"), "{stderr}");
}

#[test]
fn inis_lists_local_config() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("gitarchive.toml"), "").unwrap();

    let output = gitarchive(&["inis"], temp.path());
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("[local] gitarchive.toml"));
}

#[test]
fn options_lists_effective_values() {
    let temp = TempDir::new().unwrap();
    let output = gitarchive(&["options"], temp.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().any(|l| l.starts_with("archive.branch_name")));
    assert!(stdout.lines().any(|l| l.starts_with("global.output_log_level")));
}
