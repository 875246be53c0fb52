// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments for the `archive` command.
//!
//! ```text
//! archive DATA_DIR
//!   --git-dir DIR                    repository (created if missing)
//!   --branch-name / --tag-name ...   templates, see -k
//!   --notes REF FILE                 attach FILE as a note under REF
//!   --push [REMOTE]                  push afterwards
//!   -k KEY=VALUE                     template keyword
//! ```
//!
//! Every flag left unset falls back to the `[archive]` configuration. Switches
//! come in pairs (`--bare` / `--no-bare`) so either setting can be overridden;
//! the last one given wins.

use std::path::PathBuf;

use clap::Args;

/// Arguments for the `archive` command.
#[derive(Debug, Clone, Args)]
pub struct ArchiveArgs {
    /// Directory whose contents are archived.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Git repository to archive into.
    #[arg(long, value_name = "DIR")]
    pub git_dir: Option<PathBuf>,

    /// Fail instead of creating a missing repository.
    #[arg(long, overrides_with = "create")]
    pub no_create: bool,

    /// Create a missing repository even if the configuration says not to.
    #[arg(long, overrides_with = "no_create")]
    pub create: bool,

    /// Create a bare repository if one has to be created.
    #[arg(long, overrides_with = "no_bare")]
    pub bare: bool,

    /// Create a non-bare repository even if the configuration asks for bare.
    #[arg(long, overrides_with = "bare")]
    pub no_bare: bool,

    /// Commit message subject template.
    #[arg(long, value_name = "TEMPLATE")]
    pub commit_msg_subject: Option<String>,

    /// Commit message body template.
    #[arg(long, value_name = "TEMPLATE")]
    pub commit_msg_body: Option<String>,

    /// Branch name template.
    #[arg(long, value_name = "TEMPLATE")]
    pub branch_name: Option<String>,

    /// Do not tag the commit.
    #[arg(long, overrides_with = "tag")]
    pub no_tag: bool,

    /// Tag the commit even if the configuration disables tagging.
    #[arg(long, overrides_with = "no_tag")]
    pub tag: bool,

    /// Tag name template; `{tag_number}` is filled in automatically.
    #[arg(long, value_name = "TEMPLATE")]
    pub tag_name: Option<String>,

    /// Tag message subject template.
    #[arg(long, value_name = "TEMPLATE")]
    pub tag_msg_subject: Option<String>,

    /// Tag message body template.
    #[arg(long, value_name = "TEMPLATE")]
    pub tag_msg_body: Option<String>,

    /// Path (relative to DATA_DIR) to leave out of the commit.
    /// Can be specified multiple times.
    #[arg(long, value_name = "PATH", action = clap::ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Attach FILE as a git note under REF (may contain `{branch_name}`).
    /// Can be specified multiple times.
    #[arg(
        long,
        num_args = 2,
        value_names = ["REF", "FILE"],
        action = clap::ArgAction::Append
    )]
    pub notes: Vec<String>,

    /// Push tags afterwards; with REMOTE, also push the branch and notes.
    #[arg(long, value_name = "REMOTE", num_args = 0..=1)]
    pub push: Option<Option<String>>,

    /// Template keyword. Can be specified multiple times.
    #[arg(
        short = 'k',
        long = "keyword",
        value_name = "KEY=VALUE",
        value_parser = parse_keyword,
        action = clap::ArgAction::Append
    )]
    pub keywords: Vec<(String, String)>,

    /// Print the outcome as JSON instead of the commit id.
    #[arg(long)]
    pub json: bool,
}

impl ArchiveArgs {
    /// `--notes` values as `(ref, file)` pairs.
    pub fn note_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.notes
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }

    /// `--create` / `--no-create`; `None` when neither was given.
    #[must_use]
    pub const fn allow_create(&self) -> Option<bool> {
        switch(self.create, self.no_create)
    }

    /// `--bare` / `--no-bare`; `None` when neither was given.
    #[must_use]
    pub const fn bare_repo(&self) -> Option<bool> {
        switch(self.bare, self.no_bare)
    }

    /// `--tag` / `--no-tag`; `None` when neither was given.
    #[must_use]
    pub const fn tagging(&self) -> Option<bool> {
        switch(self.tag, self.no_tag)
    }
}

const fn switch(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn parse_keyword(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{s}'")),
    }
}
