// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gitarchive using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gitarchive [global options] <command>
//! archive <DATA_DIR> [options]
//! options
//! inis
//! version
//! ```

pub mod archive;
pub mod global;


use clap::{Parser, Subcommand};

use crate::cli::archive::ArchiveArgs;
use crate::cli::global::GlobalOptions;

/// Archive test result directories into a Git repository.
#[derive(Debug, Parser)]
#[command(
    name = "gitarchive",
    author,
    version,
    about = "Archive test results into a Git repository",
    long_about = "gitarchive Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Commits the contents of a directory onto a branch of a Git\n\
                  repository without touching its work tree, then tags the\n\
                  commit with an auto-incrementing run number.\n\n\
                  Branch, tag and message names are templates: `{key}` is\n\
                  replaced by the value given with `-k key=value` or the\n\
                  [keywords] table of the configuration.",
    after_help = "CONFIGURATION FILES:\n\n\
                  gitarchive reads `gitarchive.toml` from the current directory\n\
                  if present, then every file given with --ini, in order.\n\
                  GITARCHIVE__SECTION__KEY environment variables override both,\n\
                  and command-line flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    Version,

    /// Lists all options and their values from the configuration.
    Options,

    /// Lists the configuration files used.
    Inis,

    /// Archives a directory into a Git repository.
    Archive(ArchiveArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
