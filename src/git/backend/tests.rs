// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{GitMutation, GitQuery, GixBackend, LiveBackend, ShellBackend};
use std::ffi::OsStr;
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn canonical(path: &Path) -> std::path::PathBuf {
    path.canonicalize().expect("failed to canonicalize")
}

const IDENTITY: [(&str, &str); 4] = [
    ("GIT_AUTHOR_NAME", "Test"),
    ("GIT_AUTHOR_EMAIL", "test@test.com"),
    ("GIT_COMMITTER_NAME", "Test"),
    ("GIT_COMMITTER_EMAIL", "test@test.com"),
];

fn identity_env() -> Vec<(&'static str, &'static OsStr)> {
    IDENTITY
        .iter()
        .map(|(k, v)| (*k, OsStr::new(*v)))
        .collect()
}

#[test]
fn test_shell_backend_open_rejects_plain_directory() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("data.txt"), "x").unwrap();
    assert!(ShellBackend.open(temp.path()).is_err());
}

#[test]
fn test_gix_backend_open_rejects_plain_directory() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("data.txt"), "x").unwrap();
    assert!(GixBackend.open(temp.path()).is_err());
}

#[test]
fn test_backends_agree_on_layout() {
    let temp = temp_dir();
    ShellBackend
        .init_repo(temp.path(), false)
        .expect("failed to init repo");

    let gix = GixBackend.open(temp.path()).expect("gix open");
    let shell = ShellBackend.open(temp.path()).expect("shell open");

    assert!(!gix.is_bare);
    assert!(!shell.is_bare);
    assert_eq!(canonical(&gix.git_dir), canonical(&shell.git_dir));
    assert_eq!(canonical(&gix.top_dir), canonical(temp.path()));
    assert_eq!(canonical(&shell.top_dir), canonical(temp.path()));
}

#[test]
fn test_bare_layout_uses_git_dir_as_top() {
    let temp = temp_dir();
    ShellBackend
        .init_repo(temp.path(), true)
        .expect("failed to init bare repo");

    for layout in [
        GixBackend.open(temp.path()).expect("gix open"),
        ShellBackend.open(temp.path()).expect("shell open"),
    ] {
        assert!(layout.is_bare);
        assert_eq!(canonical(&layout.git_dir), canonical(temp.path()));
        assert_eq!(canonical(&layout.top_dir), canonical(temp.path()));
    }
}

#[test]
fn test_subdirectory_of_repo_is_not_a_repo() {
    let temp = temp_dir();
    ShellBackend.init_repo(temp.path(), false).unwrap();
    let sub = temp.path().join("nested");
    std::fs::create_dir(&sub).unwrap();
    std::fs::write(sub.join("file"), "x").unwrap();

    assert!(GixBackend.open(&sub).is_err());
    assert!(ShellBackend.open(&sub).is_err());
}

#[test]
fn test_resolve_ref_missing_and_present() {
    let temp = temp_dir();
    ShellBackend.init_repo(temp.path(), false).unwrap();

    assert_eq!(
        GixBackend
            .resolve_ref(temp.path(), "refs/heads/results")
            .unwrap(),
        None
    );
    assert_eq!(
        ShellBackend
            .resolve_ref(temp.path(), "refs/heads/results")
            .unwrap(),
        None
    );

    let env = identity_env();
    let tree = ShellBackend
        .run(temp.path(), &["write-tree"], &env)
        .expect("write-tree");
    let commit = ShellBackend
        .run(temp.path(), &["commit-tree", &tree, "-m", "empty"], &env)
        .expect("commit-tree");
    ShellBackend
        .run(
            temp.path(),
            &["update-ref", "refs/heads/results", &commit],
            &[],
        )
        .expect("update-ref");

    assert_eq!(
        GixBackend
            .resolve_ref(temp.path(), "refs/heads/results")
            .unwrap(),
        Some(commit.clone())
    );
    assert_eq!(
        LiveBackend
            .resolve_ref(temp.path(), "refs/heads/results")
            .unwrap(),
        Some(commit)
    );
}

#[test]
fn test_current_branch_consistency() {
    let temp = temp_dir();
    ShellBackend.init_repo(temp.path(), false).unwrap();
    ShellBackend
        .run(temp.path(), &["symbolic-ref", "HEAD", "refs/heads/results"], &[])
        .unwrap();

    assert_eq!(
        GixBackend.current_branch(temp.path()).unwrap().as_deref(),
        Some("results")
    );
    assert_eq!(
        ShellBackend.current_branch(temp.path()).unwrap().as_deref(),
        Some("results")
    );
}

#[test]
fn test_failed_command_reports_stderr() {
    let temp = temp_dir();
    ShellBackend.init_repo(temp.path(), false).unwrap();

    let err = ShellBackend
        .run(temp.path(), &["rev-parse", "--verify", "no-such-ref"], &[])
        .unwrap_err();
    let message = err.to_string();
    assert!(
        message.starts_with("git command failed: git rev-parse --verify no-such-ref"),
        "unexpected error: {message}"
    );
}
