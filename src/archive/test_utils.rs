// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities for archive tests.
//!
//! `FakeBackend` records every git invocation and can fail on demand;
//! `run_with_logs` captures tracing output.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use crate::error::{GitError, GitResult};
use crate::git::{GitMutation, GitQuery, RepoLayout};

pub(crate) const TREE: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";
pub(crate) const COMMIT: &str = "c0ffeec0ffeec0ffeec0ffeec0ffeec0ffeec0ff";

/// One recorded git invocation.
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub(crate) cwd: PathBuf,
    pub(crate) args: Vec<String>,
    pub(crate) env: Vec<(String, OsString)>,
}

impl Call {
    pub(crate) fn subcommand(&self) -> &str {
        self.args.first().map_or("", String::as_str)
    }

    pub(crate) fn env_var(&self, name: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_os_str())
    }
}

/// Scripted git backend.
///
/// Repository metadata lives in a real temp dir so the temporary index can
/// be allocated; `git add` creates the index file the way git would.
pub(crate) struct FakeBackend {
    root: TempDir,
    tags: Vec<String>,
    tips: HashMap<String, String>,
    current: Option<String>,
    bare: bool,
    fail_on: Option<(String, usize)>,
    calls: RefCell<Vec<Call>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("git")).unwrap();
        let data = root.path().join("data");
        std::fs::create_dir(&data).unwrap();
        std::fs::write(data.join("results.json"), "{}").unwrap();
        Self {
            root,
            tags: Vec::new(),
            tips: HashMap::new(),
            current: None,
            bare: false,
            fail_on: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| (*t).to_string()).collect();
        self
    }

    pub(crate) fn with_branch_tip(mut self, branch: &str, sha: &str) -> Self {
        self.tips
            .insert(format!("refs/heads/{branch}"), sha.to_string());
        self
    }

    pub(crate) fn with_current_branch(mut self, branch: &str) -> Self {
        self.current = Some(branch.to_string());
        self
    }

    pub(crate) const fn bare(mut self) -> Self {
        self.bare = true;
        self
    }

    /// Fail the `nth` (1-based) invocation of `subcommand`.
    pub(crate) fn failing_at(mut self, subcommand: &str, nth: usize) -> Self {
        self.fail_on = Some((subcommand.to_string(), nth));
        self
    }

    /// Path to hand to `provision`.
    pub(crate) fn repo_path(&self) -> &Path {
        self.root.path()
    }

    pub(crate) fn git_dir(&self) -> PathBuf {
        self.root.path().join("git")
    }

    pub(crate) fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn subcommands(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.subcommand().to_string())
            .collect()
    }

    pub(crate) fn find(&self, subcommand: &str) -> Option<Call> {
        self.calls
            .borrow()
            .iter()
            .find(|c| c.subcommand() == subcommand)
            .cloned()
    }

    /// Temporary index files left in the git dir.
    pub(crate) fn leftover_indexes(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.git_dir())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(OsStr::to_str)
                    .is_some_and(|n| n.starts_with("index.gitarchive"))
            })
            .collect()
    }

    fn record(&self, cwd: &Path, args: &[&str], env: &[(&str, &OsStr)]) -> GitResult<()> {
        let call = Call {
            cwd: cwd.to_path_buf(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.to_os_string()))
                .collect(),
        };
        let subcommand = call.subcommand().to_string();
        let mut calls = self.calls.borrow_mut();
        calls.push(call);

        if let Some((fail, nth)) = &self.fail_on {
            let seen = calls.iter().filter(|c| c.subcommand() == fail).count();
            if *fail == subcommand && seen == *nth {
                return Err(GitError::CommandFailed {
                    command: format!("git {}", args.join(" ")),
                    message: "injected failure".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl GitQuery for FakeBackend {
    fn open(&self, path: &Path) -> GitResult<RepoLayout> {
        let git_dir = self.git_dir();
        let top_dir = if self.bare {
            git_dir.clone()
        } else {
            path.to_path_buf()
        };
        Ok(RepoLayout {
            is_bare: self.bare,
            git_dir,
            top_dir,
        })
    }

    fn resolve_ref(&self, _repo: &Path, name: &str) -> GitResult<Option<String>> {
        Ok(self.tips.get(name).cloned())
    }

    fn current_branch(&self, _repo: &Path) -> GitResult<Option<String>> {
        Ok(self.current.clone())
    }
}

impl GitMutation for FakeBackend {
    fn init_repo(&self, path: &Path, bare: bool) -> GitResult<()> {
        let args: &[&str] = if bare { &["init", "--bare"] } else { &["init"] };
        self.record(path, args, &[])
    }

    fn run(&self, repo: &Path, args: &[&str], env: &[(&str, &OsStr)]) -> GitResult<String> {
        self.record(repo, args, env)?;
        let output = match args {
            ["add", ..] => {
                if let Some((_, index)) = env.iter().find(|(k, _)| *k == "GIT_INDEX_FILE") {
                    std::fs::write(index, b"DIRC").unwrap();
                }
                String::new()
            }
            ["write-tree"] => TREE.to_string(),
            ["commit-tree", ..] => COMMIT.to_string(),
            ["tag", "--list"] => self.tags.join("\n"),
            _ => String::new(),
        };
        Ok(output)
    }
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs `f` while capturing INFO-level tracing output.
pub(crate) fn run_with_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(false)
        .with_level(false)
        .finish();

    let result = {
        let _guard = tracing::subscriber::set_default(subscriber);
        f()
    };

    let logs = String::from_utf8_lossy(&buffer.lock().unwrap()).to_string();
    (result, logs)
}
