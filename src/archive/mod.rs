// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive pipeline.
//!
//! ```text
//! ArchiveOptions
//!      |
//!      v
//! provision(git_dir) ---------------------------> Repository
//!      |
//!      v  expand before any write
//! commit message, branch name, notes refs, tag name + message
//!      |
//!      v
//! commit_data (private index, commit-tree, notes, update-ref)
//!      |
//!      v
//! tag -a <name> <commit>          (unless tagging is off)
//!      |
//!      v
//! push --tags [remote branch notes...]   (unless pushing is off)
//!      |
//!      v
//! ArchiveOutcome
//! ```
//!
//! Every template is expanded before the first git write, so a bad keyword
//! never leaves a half-written archive behind.

pub mod commit;
pub mod provision;
pub mod tag;
pub mod template;

#[cfg(test)]
pub(crate) mod test_utils;

use std::path::PathBuf;

use bon::Builder;
use serde::Serialize;
use tracing::info;

use crate::error::{ArchiveError, ArchiveResult, TagError, TemplateError};
use crate::git::{GitBackend, Repository};

pub use commit::{NoteAttachment, commit_data, full_notes_ref};
pub use provision::provision;
pub use tag::{TAG_NUMBER, allocate_tag_name, expand_tag_strings};
pub use template::{TemplateContext, TemplateValue, expand, expand_message};

/// Where, if anywhere, to push after archiving.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PushMode {
    #[default]
    Disabled,
    /// `git push --tags` to the configured upstream.
    Default,
    /// Push tags, the archive branch and its notes refs to a named remote.
    Remote(String),
}

/// Templates for the annotated tag created on each archive commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTemplates {
    pub name: String,
    pub subject: String,
    pub body: String,
}

/// Everything one archive run needs.
#[derive(Debug, Clone, Builder)]
pub struct ArchiveOptions {
    /// Directory whose contents are committed.
    #[builder(into, setters(name = with_data_dir))]
    pub data_dir: PathBuf,

    /// Repository to archive into.
    #[builder(into, setters(name = with_git_dir))]
    pub git_dir: PathBuf,

    /// Create the repository if it does not exist.
    #[builder(setters(name = with_allow_create), default = true)]
    pub allow_create: bool,

    /// Create a bare repository.
    #[builder(setters(name = with_bare), default)]
    pub bare: bool,

    #[builder(into, setters(name = with_commit_msg_subject))]
    pub commit_msg_subject: String,

    #[builder(into, setters(name = with_commit_msg_body), default)]
    pub commit_msg_body: String,

    /// Branch name template.
    #[builder(into, setters(name = with_branch_name))]
    pub branch_name: String,

    /// Tag templates; `None` or an empty name disables tagging.
    #[builder(setters(name = with_tag))]
    pub tag: Option<TagTemplates>,

    /// Paths (relative to the data dir) left out of the commit.
    #[builder(setters(name = with_exclude), default)]
    pub exclude: Vec<String>,

    #[builder(setters(name = with_notes), default)]
    pub notes: Vec<NoteAttachment>,

    #[builder(setters(name = with_push), default)]
    pub push: PushMode,

    /// Values available to every template.
    #[builder(setters(name = with_keywords), default)]
    pub keywords: TemplateContext,
}

/// Result of a successful archive run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveOutcome {
    pub commit: String,
    pub branch: String,
    pub tag: Option<String>,
    pub notes_refs: Vec<String>,
    pub pushed: bool,
}

/// Archive `options.data_dir` into the repository at `options.git_dir`.
///
/// # Errors
///
/// Returns an `ArchiveError` for the first failing step. Template errors
/// are reported before the repository is written to.
pub fn run(backend: &dyn GitBackend, options: &ArchiveOptions) -> ArchiveResult<ArchiveOutcome> {
    if !options.data_dir.is_dir() {
        return Err(ArchiveError::NotADirectory(
            options.data_dir.display().to_string().into_boxed_str(),
        ));
    }

    let repo = provision(backend, &options.git_dir, options.allow_create, options.bare)?;
    let keywords = &options.keywords;

    let message = expand_message(
        &options.commit_msg_subject,
        &options.commit_msg_body,
        keywords,
    )?;
    let branch = expand(&options.branch_name, keywords)?;
    let notes_refs = options
        .notes
        .iter()
        .map(|note| note.resolve_ref(&branch).map(|r| full_notes_ref(&r)))
        .collect::<Result<Vec<_>, TemplateError>>()?;
    let tag = match options.tag.as_ref().filter(|t| !t.name.is_empty()) {
        Some(templates) => Some(expand_tag_strings(
            &repo,
            &templates.name,
            &templates.subject,
            &templates.body,
            keywords,
        )?),
        None => None,
    };

    let commit = commit_data(
        &repo,
        &options.data_dir,
        &branch,
        &message,
        &options.exclude,
        &options.notes,
    )?;

    let tag = match tag {
        Some((name, message)) => {
            info!(tag = %name, commit = %commit, "creating tag");
            repo.run_cmd(&["tag", "-a", "-m", &message, &name, &commit])
                .map_err(|source| TagError::Create {
                    name: name.clone(),
                    source,
                })?;
            Some(name)
        }
        None => None,
    };

    let pushed = push(&repo, &options.push, &branch, &notes_refs)?;

    Ok(ArchiveOutcome {
        commit,
        branch,
        tag,
        notes_refs,
        pushed,
    })
}

fn push(
    repo: &Repository<'_>,
    mode: &PushMode,
    branch: &str,
    notes_refs: &[String],
) -> ArchiveResult<bool> {
    let mut args = vec!["push", "--tags"];
    match mode {
        PushMode::Disabled => return Ok(false),
        PushMode::Default => info!("pushing tags to default remote"),
        PushMode::Remote(remote) => {
            info!(remote = %remote, branch, "pushing data to remote");
            args.push(remote);
            args.push(branch);
            args.extend(notes_refs.iter().map(String::as_str));
        }
    }
    repo.run_cmd(&args).map_err(ArchiveError::push)?;
    Ok(true)
}
