// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend   (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI)
//! GitBackend = GitQuery + GitMutation
//!              LiveBackend routes each half to the backend above
//! ```

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tracing::{debug, trace};

use crate::error::{GitError, GitResult, GixError};

/// Resolved `git` executable, looked up once per process.
static GIT_EXECUTABLE: OnceLock<Option<PathBuf>> = OnceLock::new();

fn git_executable() -> GitResult<&'static Path> {
    GIT_EXECUTABLE
        .get_or_init(|| which::which("git").ok())
        .as_deref()
        .ok_or(GitError::ExecutableNotFound)
}

/// Where an opened repository keeps its metadata and files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    /// Repository has no work tree.
    pub is_bare: bool,
    /// Absolute path of the git metadata directory.
    pub git_dir: PathBuf,
    /// Work tree root, or the git dir for bare repositories.
    pub top_dir: PathBuf,
}

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Open `path` as a repository. `path` must be the repository itself
    /// (work tree root or bare git dir), not a directory inside one.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `path` is not the top of a repository.
    fn open(&self, path: &Path) -> GitResult<RepoLayout>;

    /// Resolve a ref name to a commit id (None if it does not exist).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be read.
    fn resolve_ref(&self, repo: &Path, name: &str) -> GitResult<Option<String>>;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(&self, repo: &Path) -> GitResult<Option<String>>;
}

// --- Mutation Trait (Write operations) ---

/// Git operations that modify repository state.
pub trait GitMutation {
    /// Initialize a new repository inside `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository initialization fails.
    fn init_repo(&self, path: &Path, bare: bool) -> GitResult<()>;

    /// Run an arbitrary git subcommand in `repo` with extra environment
    /// variables, returning its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if git cannot be spawned or exits unsuccessfully.
    fn run(&self, repo: &Path, args: &[&str], env: &[(&str, &OsStr)]) -> GitResult<String>;
}

/// Full collaborator used by the archive pipeline.
pub trait GitBackend: GitQuery + GitMutation {}

impl<T: GitQuery + GitMutation + ?Sized> GitBackend for T {}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Provides read-only operations without spawning subprocesses. Every call
/// opens the repository afresh so refs written by the CLI are always seen.
#[derive(Debug, Default, Clone, Copy)]
pub struct GixBackend;

impl GixBackend {
    fn open_repo(path: &Path) -> GitResult<gix::Repository> {
        gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))
    }
}

impl GitQuery for GixBackend {
    fn open(&self, path: &Path) -> GitResult<RepoLayout> {
        let repo = Self::open_repo(path)?;
        let git_dir = repo.git_dir().to_path_buf();
        let top_dir = repo
            .workdir()
            .map_or_else(|| git_dir.clone(), Path::to_path_buf);
        Ok(RepoLayout {
            is_bare: repo.is_bare(),
            git_dir,
            top_dir,
        })
    }

    fn resolve_ref(&self, repo: &Path, name: &str) -> GitResult<Option<String>> {
        let repo = Self::open_repo(repo)?;
        Ok(repo
            .rev_parse_single(name)
            .ok()
            .map(|id| id.detach().to_string()))
    }

    fn current_branch(&self, repo: &Path) -> GitResult<Option<String>> {
        let repo = Self::open_repo(repo)?;
        let head = repo
            .head_name()
            .map_err(|e| GitError::Gix(GixError::Head(e)))?;
        Ok(head.map(|name| name.shorten().to_string()))
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Required for every write: staging against a private index, plumbing
/// commands (`write-tree`, `commit-tree`, `update-ref`), notes, tags, push.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(
        args: &[&str],
        cwd: &Path,
        env: &[(&str, &OsStr)],
    ) -> GitResult<String> {
        let command = format!("git {}", args.join(" "));
        debug!(cwd = %cwd.display(), cmd = %command, "exec");

        let output = Command::new(git_executable()?)
            .args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .envs(env.iter().copied())
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        trace!(cmd = %command, stdout = %stdout, "output");
        Ok(stdout)
    }
}

impl GitMutation for ShellBackend {
    fn init_repo(&self, path: &Path, bare: bool) -> GitResult<()> {
        let mut args = vec!["init", "--quiet"];
        if bare {
            args.push("--bare");
        }
        Self::git_command(&args, path, &[])?;
        Ok(())
    }

    fn run(&self, repo: &Path, args: &[&str], env: &[(&str, &OsStr)]) -> GitResult<String> {
        Self::git_command(args, repo, env)
    }
}

impl GitQuery for ShellBackend {
    fn open(&self, path: &Path) -> GitResult<RepoLayout> {
        let not_a_repo = || GitError::NotARepository {
            path: path.display().to_string(),
        };

        let output = Self::git_command(
            &["rev-parse", "--is-bare-repository", "--absolute-git-dir"],
            path,
            &[],
        )
        .map_err(|_| not_a_repo())?;
        let mut lines = output.lines();
        let is_bare = lines.next() == Some("true");
        let git_dir = PathBuf::from(lines.next().ok_or_else(not_a_repo)?);

        let top_dir = if is_bare {
            git_dir.clone()
        } else {
            PathBuf::from(Self::git_command(&["rev-parse", "--show-toplevel"], path, &[])?)
        };

        // rev-parse discovers upwards; only accept `path` itself
        let same = |a: &Path, b: &Path| match (a.canonicalize(), b.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same(&top_dir, path) {
            return Err(not_a_repo());
        }

        Ok(RepoLayout {
            is_bare,
            git_dir,
            top_dir,
        })
    }

    fn resolve_ref(&self, repo: &Path, name: &str) -> GitResult<Option<String>> {
        match Self::git_command(&["rev-parse", "--verify", "--quiet", name], repo, &[]) {
            Ok(sha) => Ok(Some(sha)),
            Err(GitError::CommandFailed { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn current_branch(&self, repo: &Path) -> GitResult<Option<String>> {
        Self::git_command(&["symbolic-ref", "--short", "-q", "HEAD"], repo, &[])
            .map_or_else(|_| Ok(None), |branch| Ok(Some(branch)))
    }
}

// --- LiveBackend (routing) ---

/// Production backend: queries through gix, mutations through the git CLI.
#[derive(Default, Clone, Copy)]
pub struct LiveBackend;

impl fmt::Debug for LiveBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LiveBackend(gix+cli)")
    }
}

impl GitQuery for LiveBackend {
    fn open(&self, path: &Path) -> GitResult<RepoLayout> {
        GixBackend.open(path)
    }

    fn resolve_ref(&self, repo: &Path, name: &str) -> GitResult<Option<String>> {
        GixBackend.resolve_ref(repo, name)
    }

    fn current_branch(&self, repo: &Path) -> GitResult<Option<String>> {
        GixBackend.current_branch(repo)
    }
}

impl GitMutation for LiveBackend {
    fn init_repo(&self, path: &Path, bare: bool) -> GitResult<()> {
        ShellBackend.init_repo(path, bare)
    }

    fn run(&self, repo: &Path, args: &[&str], env: &[(&str, &OsStr)]) -> GitResult<String> {
        ShellBackend.run(repo, args, env)
    }
}

#[cfg(test)]
mod tests;
