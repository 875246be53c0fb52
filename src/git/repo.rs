// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository handle.
//!
//! ```text
//! Repository { backend, layout }
//!   run_cmd    --> GitMutation::run  (cwd = top_dir)
//!   run_cmd_in --> GitMutation::run  (caller's cwd and env)
//!   resolve_ref / current_branch --> GitQuery
//! ```
//!
//! The handle carries the backend explicitly; nothing in the crate reaches
//! for an ambient git context.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

use crate::error::GitResult;

use super::backend::{GitBackend, RepoLayout};

/// An opened repository together with the backend that operates on it.
pub struct Repository<'b> {
    backend: &'b dyn GitBackend,
    layout: RepoLayout,
}

impl fmt::Debug for Repository<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl<'b> Repository<'b> {
    /// Open `path` through `backend`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `path` is not the top of a repository.
    pub fn open(backend: &'b dyn GitBackend, path: &Path) -> GitResult<Self> {
        let layout = backend.open(path)?;
        Ok(Self { backend, layout })
    }

    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.layout.is_bare
    }

    /// Git metadata directory (`.git`, or the repository itself when bare).
    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.layout.git_dir
    }

    /// Work tree root, or the git dir for bare repositories.
    #[must_use]
    pub fn top_dir(&self) -> &Path {
        &self.layout.top_dir
    }

    /// Run a git subcommand at the top of the repository.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn run_cmd(&self, args: &[&str]) -> GitResult<String> {
        self.backend.run(self.top_dir(), args, &[])
    }

    /// Run a git subcommand from `cwd` with extra environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the command fails.
    pub fn run_cmd_in(
        &self,
        cwd: &Path,
        args: &[&str],
        env: &[(&str, &OsStr)],
    ) -> GitResult<String> {
        self.backend.run(cwd, args, env)
    }

    /// Resolve a ref to a commit id.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be read.
    pub fn resolve_ref(&self, name: &str) -> GitResult<Option<String>> {
        self.backend.resolve_ref(self.top_dir(), name)
    }

    /// Name of the checked-out branch (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if HEAD cannot be read.
    pub fn current_branch(&self) -> GitResult<Option<String>> {
        self.backend.current_branch(self.top_dir())
    }

    /// All tag names, one per entry.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git tag` fails.
    pub fn tags(&self) -> GitResult<Vec<String>> {
        Ok(self
            .run_cmd(&["tag", "--list"])?
            .lines()
            .map(str::to_string)
            .collect())
    }
}
