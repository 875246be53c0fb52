// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for gitarchive.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. gitarchive.toml (cwd, optional)
//! 3. --ini FILE (repeatable)
//! 4. GITARCHIVE__* env vars
//! 5. CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! GITARCHIVE__ARCHIVE__GIT_DIR=/srv/results  → archive.git_dir = "/srv/results"
//! GITARCHIVE__ARCHIVE__PUSH=origin           → archive.push = "origin"
//! GITARCHIVE__KEYWORDS__MACHINE=qemux86      → keywords.machine = "qemux86"
//! ```
//!
//! # Example
//!
//! ```toml
//! [archive]
//! git_dir = "/srv/test-results"
//! branch_name = "{hostname}/{branch}"
//! exclude = ["*.tmp"]
//! push = "origin"
//!
//! [[archive.notes]]
//! ref = "test-results/{branch_name}"
//! file = "summary.txt"
//!
//! [keywords]
//! hostname = "builder-1"
//! ```

pub mod loader;
pub mod types;


use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::archive::TemplateContext;
use crate::error::Result;

use loader::ConfigLoader;
use types::{ArchiveConfig, GlobalConfig};

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub global: GlobalConfig,
    pub archive: ArchiveConfig,
    /// Template keywords; `-k KEY=VALUE` entries override these.
    pub keywords: TemplateContext,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use gitarchive::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("gitarchive.toml")
    ///     .with_env_prefix("GITARCHIVE")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format configuration options for display, one `key = value` per line,
    /// sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_archive_options(&mut options);
        for key in self.keywords.keys() {
            if let Some(value) = self.keywords.get(key) {
                options.insert(format!("keywords.{key}"), value.to_string());
            }
        }

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(log_file) = &self.global.log_file {
            options.insert("global.log_file".into(), log_file.display().to_string());
        }
    }

    fn format_archive_options(&self, options: &mut BTreeMap<String, String>) {
        let archive = &self.archive;
        // templates may hold newlines; keep one option per line
        let escaped = |s: &str| s.escape_default().to_string();

        options.insert(
            "archive.git_dir".into(),
            archive
                .git_dir
                .as_ref()
                .map_or_else(String::new, |p| p.display().to_string()),
        );
        options.insert("archive.no_create".into(), archive.no_create.to_string());
        options.insert("archive.bare".into(), archive.bare.to_string());
        options.insert(
            "archive.commit_msg_subject".into(),
            escaped(&archive.commit_msg_subject),
        );
        options.insert(
            "archive.commit_msg_body".into(),
            escaped(&archive.commit_msg_body),
        );
        options.insert("archive.branch_name".into(), escaped(&archive.branch_name));
        options.insert("archive.no_tag".into(), archive.no_tag.to_string());
        options.insert("archive.tag_name".into(), escaped(&archive.tag_name));
        options.insert(
            "archive.tag_msg_subject".into(),
            escaped(&archive.tag_msg_subject),
        );
        options.insert(
            "archive.tag_msg_body".into(),
            escaped(&archive.tag_msg_body),
        );
        options.insert("archive.exclude".into(), archive.exclude.join(", "));
        options.insert(
            "archive.notes".into(),
            archive
                .notes
                .iter()
                .map(|n| format!("{} <- {}", n.ref_pattern, n.file.display()))
                .collect::<Vec<_>>()
                .join(", "),
        );
        options.insert("archive.push".into(), archive.push.to_string());
    }
}
