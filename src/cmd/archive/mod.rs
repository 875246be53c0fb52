// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Archive command implementation.
//!
//! ```text
//! ArchiveArgs ──┐
//!               ├─ build_archive_options ──> ArchiveOptions ──> archive::run(LiveBackend)
//! Config ───────┘                                                   |
//!                                            stdout: commit id or JSON outcome
//! ```
//!
//! Flags win over `[archive]`, in both directions for switches; list flags (`--exclude`, `--notes`) replace the
//! configured list rather than extend it. `-k` keywords are layered on top of
//! `[keywords]`.

use tracing::debug;

use crate::archive::{
    self, ArchiveOptions, ArchiveOutcome, NoteAttachment, PushMode, TagTemplates,
};
use crate::cli::archive::ArchiveArgs;
use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::git::LiveBackend;

/// Merge command-line arguments over the loaded configuration.
///
/// # Errors
///
/// Returns `ConfigError::MissingKey` if no repository was given either way.
pub fn build_archive_options(args: &ArchiveArgs, config: &Config) -> Result<ArchiveOptions> {
    let defaults = &config.archive;

    let git_dir = args
        .git_dir
        .clone()
        .or_else(|| defaults.git_dir.clone())
        .ok_or_else(|| ConfigError::MissingKey {
            section: "archive".to_string(),
            key: "git_dir".to_string(),
        })?;

    let pick = |flag: &Option<String>, configured: &String| {
        flag.clone().unwrap_or_else(|| configured.clone())
    };

    let tag = args.tagging().unwrap_or(!defaults.no_tag).then(|| TagTemplates {
        name: pick(&args.tag_name, &defaults.tag_name),
        subject: pick(&args.tag_msg_subject, &defaults.tag_msg_subject),
        body: pick(&args.tag_msg_body, &defaults.tag_msg_body),
    });

    let exclude = if args.exclude.is_empty() {
        defaults.exclude.clone()
    } else {
        args.exclude.clone()
    };

    let notes = if args.notes.is_empty() {
        defaults.notes.clone()
    } else {
        args.note_pairs()
            .map(|(notes_ref, file)| NoteAttachment::new(notes_ref, file))
            .collect()
    };

    let push = match &args.push {
        Some(None) => PushMode::Default,
        Some(Some(remote)) => PushMode::Remote(remote.clone()),
        None => defaults.push.clone().into(),
    };

    let mut keywords = config.keywords.clone();
    keywords.extend(
        args.keywords
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect(),
    );

    Ok(ArchiveOptions::builder()
        .with_data_dir(&args.data_dir)
        .with_git_dir(git_dir)
        .with_allow_create(args.allow_create().unwrap_or(!defaults.no_create))
        .with_bare(args.bare_repo().unwrap_or(defaults.bare))
        .with_commit_msg_subject(pick(&args.commit_msg_subject, &defaults.commit_msg_subject))
        .with_commit_msg_body(pick(&args.commit_msg_body, &defaults.commit_msg_body))
        .with_branch_name(pick(&args.branch_name, &defaults.branch_name))
        .maybe_with_tag(tag)
        .with_exclude(exclude)
        .with_notes(notes)
        .with_push(push)
        .with_keywords(keywords)
        .build())
}

/// Render the outcome the way `archive` prints it.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_outcome(outcome: &ArchiveOutcome, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(outcome)?)
    } else {
        Ok(outcome.commit.clone())
    }
}

/// Run the archive command.
///
/// # Errors
///
/// Returns an error if the options are incomplete or any archive step fails.
pub fn run_archive_command(args: &ArchiveArgs, config: &Config) -> Result<()> {
    let options = build_archive_options(args, config)?;
    debug!(?options, "archive options");

    let outcome = archive::run(&LiveBackend, &options)?;
    println!("{}", format_outcome(&outcome, args.json)?);
    Ok(())
}
