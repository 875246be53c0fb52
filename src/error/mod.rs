// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!              ArchiveError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+------+
//!   |      |      |       |      |      |      |
//!   v      v      v       v      v      v      v
//! NotDir Template Repo Commit   Tag   Push  Cfg/Io
//! Box<str> Box    Box    Box    Box   Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Template  UnknownField, Malformed
//!   Repo      NotADirectory, NoRepo, NotARepository, CreateDir, Init
//!   Commit    TempIndex, Stage, Exclude, WriteTree, CommitTree,
//!             AddNote, UpdateRef, ResetWorktree
//!   Tag       ListTags, Matcher, Create
//!   Git       ExecutableNotFound, Spawn, CommandFailed, Gix
//!   Config    MissingKey, InvalidValue
//!
//! All variants boxed => ArchiveError fits in 24 bytes.
//! ```

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`ArchiveError`].
pub type ArchiveResult<T> = std::result::Result<T, ArchiveError>;

/// Result type for the git collaborator layer.
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Top-level error of an archive run.
///
/// Every failure of the pipeline surfaces as one of these variants. Sub-errors
/// are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The data directory does not exist or is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(Box<str>),

    /// A message or name template could not be expanded.
    #[error("template error: {0}")]
    Template(#[from] Box<TemplateError>),

    /// The target repository is unusable or missing.
    #[error("repository error: {0}")]
    Repo(#[from] Box<RepoError>),

    /// Staging, committing, attaching notes or updating the branch failed.
    #[error("commit failed: {0}")]
    Commit(#[from] Box<CommitError>),

    /// Tag allocation or creation failed.
    #[error("tag error: {0}")]
    Tag(#[from] Box<TagError>),

    /// Pushing to the remote failed.
    #[error("push failed: {0}")]
    Push(Box<GitError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl ArchiveError {
    /// Wrap a collaborator failure of the final push step.
    #[must_use]
    pub fn push(err: GitError) -> Self {
        Self::Push(Box::new(err))
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for ArchiveError {
                fn from(err: $error) -> Self {
                    ArchiveError::$variant(Box::new(err))
                }
            }
        )+
    };
}

// No `From<GitError>`: each call site picks the commit, tag or push variant.
impl_from_boxed! {
    TemplateError => Template,
    RepoError => Repo,
    CommitError => Commit,
    TagError => Tag,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Template Errors ---

/// Template expansion errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The template references a key that the context does not define.
    #[error(
        "unable to expand '{template}': unknown field '{field}' (valid fields are: {})",
        .available.join(", ")
    )]
    UnknownField {
        template: String,
        field: String,
        available: Vec<String>,
    },

    /// The template has an unbalanced or empty placeholder.
    #[error("unable to expand '{template}': {message}")]
    Malformed { template: String, message: String },
}

// --- Repository Errors ---

/// Repository provisioning errors.
#[derive(Debug, Error)]
pub enum RepoError {
    /// Path is occupied by something that is not a directory.
    #[error("invalid Git repo at {path}: path exists but is not a directory")]
    NotADirectory { path: String },

    /// No repository and creation is disabled.
    #[error("no Git repo at {path}, refusing to create one")]
    NoRepo { path: String },

    /// Non-empty directory that Git does not recognize as a repository.
    #[error(
        "non-empty directory that is not a Git repository at {path}; \
         specify an existing Git repository, an empty directory or a non-existing directory path"
    )]
    NotARepository { path: String },

    /// Failed to create the repository directory.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `git init` failed.
    #[error("failed to initialize Git repo at {path}: {source}")]
    Init {
        path: String,
        #[source]
        source: GitError,
    },
}

// --- Commit Errors ---

/// Errors while turning the data directory into a commit on the branch.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Could not allocate the temporary index.
    #[error("failed to allocate temporary index: {0}")]
    TempIndex(#[source] std::io::Error),

    /// `git add` of the data directory failed.
    #[error("failed to stage data directory: {0}")]
    Stage(#[source] GitError),

    /// Removing excluded paths from the index failed.
    #[error("failed to remove excluded paths: {0}")]
    Exclude(#[source] GitError),

    /// `git write-tree` failed.
    #[error("failed to write tree: {0}")]
    WriteTree(#[source] GitError),

    /// Looking up the branch tip failed.
    #[error("failed to resolve branch {branch}: {source}")]
    ResolveBranch {
        branch: String,
        #[source]
        source: GitError,
    },

    /// `git commit-tree` failed.
    #[error("failed to create commit object: {0}")]
    CommitTree(#[source] GitError),

    /// Attaching a note failed. Notes attached before this one stay.
    #[error("failed to add note under {notes_ref}: {source}")]
    AddNote {
        notes_ref: String,
        #[source]
        source: GitError,
    },

    /// The branch ref could not be advanced (or moved underneath us).
    #[error("failed to update branch {branch}: {source}")]
    UpdateRef {
        branch: String,
        #[source]
        source: GitError,
    },

    /// Resetting the checked-out work tree failed.
    #[error("failed to reset work tree: {0}")]
    ResetWorktree(#[source] GitError),
}

// --- Tag Errors ---

/// Tag allocation and creation errors.
#[derive(Debug, Error)]
pub enum TagError {
    /// Listing existing tags failed.
    #[error("failed to list tags: {0}")]
    ListTags(#[source] GitError),

    /// The matcher built from the name pattern did not compile.
    #[error("invalid tag matcher for '{pattern}': {source}")]
    Matcher {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `git tag` failed.
    #[error("failed to create tag {name}: {source}")]
    Create {
        name: String,
        #[source]
        source: GitError,
    },
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Git Errors ---

/// Transport-level errors of the git collaborator.
#[derive(Debug, Error)]
pub enum GitError {
    /// `git` is not on `PATH`.
    #[error("executable not found: 'git' (not in PATH)")]
    ExecutableNotFound,

    /// The git process could not be started.
    #[error("failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Git command exited unsuccessfully.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Path is not the top of a repository.
    #[error("not a git repository: {path}")]
    NotARepository { path: String },

    /// A path argument is not valid UTF-8.
    #[error("path is not valid UTF-8: {path}")]
    InvalidPath { path: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
