// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for gitarchive.
//!
//! ```text
//! Config: GlobalConfig, ArchiveConfig, keywords (free-form table)
//! push:   false | true | "remote-name"
//! ```

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::archive::{NoteAttachment, PushMode};
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::WARN,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// `[archive].push`: off, default upstream, or a named remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PushSetting {
    Enabled(bool),
    Remote(String),
}

impl Default for PushSetting {
    fn default() -> Self {
        Self::Enabled(false)
    }
}

impl fmt::Display for PushSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled(enabled) => write!(f, "{enabled}"),
            Self::Remote(remote) => f.write_str(remote),
        }
    }
}

impl From<PushSetting> for PushMode {
    fn from(setting: PushSetting) -> Self {
        match setting {
            PushSetting::Enabled(false) => Self::Disabled,
            PushSetting::Enabled(true) => Self::Default,
            PushSetting::Remote(remote) => Self::Remote(remote),
        }
    }
}

/// Archive defaults, overridable per invocation on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Repository to archive into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_dir: Option<PathBuf>,
    /// Refuse to create a missing repository.
    pub no_create: bool,
    /// Create new repositories bare.
    pub bare: bool,
    pub commit_msg_subject: String,
    pub commit_msg_body: String,
    pub branch_name: String,
    /// Skip tagging.
    pub no_tag: bool,
    pub tag_name: String,
    pub tag_msg_subject: String,
    pub tag_msg_body: String,
    /// Paths (relative to the data dir) left out of the commit.
    pub exclude: Vec<String>,
    pub notes: Vec<NoteAttachment>,
    pub push: PushSetting,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            git_dir: None,
            no_create: false,
            bare: false,
            commit_msg_subject: "Results of {branch}:{commit} on {hostname}".to_string(),
            commit_msg_body: "branch: {branch}\ncommit: {commit}\nhostname: {hostname}"
                .to_string(),
            branch_name: "{hostname}/{branch}/{machine}".to_string(),
            no_tag: false,
            tag_name: "{hostname}/{branch}/{machine}/{commit_count}-g{commit}/{tag_number}"
                .to_string(),
            tag_msg_subject: "Test run #{tag_number} of {branch}:{commit} on {hostname}"
                .to_string(),
            tag_msg_body: String::new(),
            exclude: Vec::new(),
            notes: Vec::new(),
            push: PushSetting::default(),
        }
    }
}
