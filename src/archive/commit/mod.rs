// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commit a directory straight into a branch.
//!
//! ```text
//! TempIndex (git_dir/index.gitarchive.XXXXXX, removed on drop)
//!    |   GIT_DIR, GIT_INDEX_FILE, GIT_WORK_TREE=data_dir
//!    v
//! add .  -->  rm -r --cached <exclude>  -->  write-tree
//!                                               |
//!              rev-parse refs/heads/<branch> ---+
//!                                               v
//!                                  commit-tree [-p parent]
//!                                               |
//!                     notes --ref <ref> add -F <file> (each)
//!                                               |
//!                        update-ref <branch> <new> <old>
//!                                               |
//!                 reset --hard (non-bare, branch checked out)
//! ```
//!
//! The user's own index and work tree are never touched, except for the
//! final reset when the archived branch is the one checked out.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::TempPath;
use tracing::{debug, info};

use crate::archive::template::{TemplateContext, expand};
use crate::error::{ArchiveResult, CommitError, GitError, TemplateError};
use crate::git::Repository;

/// A file whose contents are attached as a git note to the archive commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteAttachment {
    /// Notes ref; may contain `{branch_name}`.
    #[serde(rename = "ref")]
    pub ref_pattern: String,
    /// File holding the note text.
    pub file: PathBuf,
}

impl NoteAttachment {
    pub fn new(ref_pattern: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            ref_pattern: ref_pattern.into(),
            file: file.into(),
        }
    }

    /// Expand `{branch_name}` in the ref pattern.
    ///
    /// # Errors
    ///
    /// Returns a `TemplateError` if the pattern references any other field.
    pub fn resolve_ref(&self, branch: &str) -> Result<String, TemplateError> {
        expand(
            &self.ref_pattern,
            &TemplateContext::new().with("branch_name", branch),
        )
    }
}

/// Full ref name that `git notes --ref <notes_ref>` writes to.
#[must_use]
pub fn full_notes_ref(notes_ref: &str) -> String {
    if notes_ref.starts_with("refs/notes/") {
        notes_ref.to_string()
    } else if notes_ref.starts_with("notes/") {
        format!("refs/{notes_ref}")
    } else {
        format!("refs/notes/{notes_ref}")
    }
}

/// Private staging index for one archive operation.
///
/// The name is unique per invocation; the file (if git created it) is
/// removed when the guard drops, on every exit path.
struct TempIndex {
    path: TempPath,
}

impl TempIndex {
    fn new(git_dir: &Path) -> std::io::Result<Self> {
        let path = tempfile::Builder::new()
            .prefix("index.gitarchive.")
            .tempfile_in(git_dir)?
            .into_temp_path();
        // git rejects a zero-length index; let `git add` create it
        std::fs::remove_file(&path)?;
        debug!(index = %path.display(), "allocated temporary index");
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

fn path_arg(path: &Path) -> Result<&str, GitError> {
    path.to_str().ok_or_else(|| GitError::InvalidPath {
        path: path.display().to_string(),
    })
}

/// Commit the contents of `data_dir` onto `branch` and return the new commit id.
///
/// Notes are attached one after another; if one fails, the ones before it
/// stay attached and the branch is not advanced.
///
/// # Errors
///
/// Returns `ArchiveError::Commit` naming the failed step. The temporary
/// index is removed regardless.
pub fn commit_data(
    repo: &Repository<'_>,
    data_dir: &Path,
    branch: &str,
    message: &str,
    exclude: &[String],
    notes: &[NoteAttachment],
) -> ArchiveResult<String> {
    info!(branch, "committing data into branch");

    let index = TempIndex::new(repo.git_dir()).map_err(CommitError::TempIndex)?;
    let data_dir = std::path::absolute(data_dir)?;
    let env: [(&str, &OsStr); 3] = [
        ("GIT_DIR", repo.git_dir().as_os_str()),
        ("GIT_INDEX_FILE", index.path().as_os_str()),
        ("GIT_WORK_TREE", data_dir.as_os_str()),
    ];
    let staged = |args: &[&str]| repo.run_cmd_in(&data_dir, args, &env);

    staged(&["add", "."]).map_err(CommitError::Stage)?;

    if !exclude.is_empty() {
        let mut args = vec!["rm", "-r", "--cached", "--quiet", "--ignore-unmatch", "--"];
        args.extend(exclude.iter().map(String::as_str));
        staged(&args).map_err(CommitError::Exclude)?;
    }

    let tree = staged(&["write-tree"]).map_err(CommitError::WriteTree)?;

    let branch_ref = format!("refs/heads/{branch}");
    let parent = repo
        .resolve_ref(&branch_ref)
        .map_err(|source| CommitError::ResolveBranch {
            branch: branch.to_string(),
            source,
        })?;

    let mut args = vec!["commit-tree", tree.as_str(), "-m", message];
    if let Some(parent) = &parent {
        args.extend(["-p", parent.as_str()]);
    }
    let commit = staged(&args).map_err(CommitError::CommitTree)?;
    debug!(tree = %tree, commit = %commit, parent = ?parent, "created commit object");

    for note in notes {
        let notes_ref = note.resolve_ref(branch)?;
        let file = std::path::absolute(&note.file)?;
        let added = path_arg(&file).and_then(|file| {
            repo.run_cmd(&["notes", "--ref", &notes_ref, "add", "-F", file, &commit])
        });
        if let Err(source) = added {
            return Err(CommitError::AddNote { notes_ref, source }.into());
        }
        debug!(notes_ref = %notes_ref, file = %file.display(), "attached note");
    }

    // Empty old value: the ref must not exist yet
    let old = parent.as_deref().unwrap_or("");
    repo.run_cmd(&["update-ref", &branch_ref, &commit, old])
        .map_err(|source| CommitError::UpdateRef {
            branch: branch.to_string(),
            source,
        })?;

    if !repo.is_bare() {
        let current = repo.current_branch().map_err(CommitError::ResetWorktree)?;
        if current.as_deref() == Some(branch) {
            info!(top_dir = %repo.top_dir().display(), "updating HEAD to latest commit");
            repo.run_cmd(&["reset", "--hard"])
                .map_err(CommitError::ResetWorktree)?;
        }
    }

    Ok(commit)
}
