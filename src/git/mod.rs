// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git collaborator module.
//!
//! ```text
//!         archive pipeline
//!                |
//!                v
//!      ,--------------------,
//!      | Repository handle  |
//!      '---------+----------'
//!                |
//!      ,---------v----------,
//!      |  backend (traits)  |
//!      '--+--------------+--'
//!         |              |
//!         v              v
//!    GitQuery       GitMutation
//!   (gix, read)     (CLI, write)
//!         |              |
//!         v              v
//!    GixBackend     ShellBackend
//!    .open          .init_repo
//!    .resolve_ref   .run(argv, env)
//!    .current_branch
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI for plumbing, notes, tags and push.
//! **`LiveBackend`**: routes queries to the former and writes to the latter.

pub mod backend;
pub mod repo;

pub use backend::{GitBackend, GitMutation, GitQuery, LiveBackend, RepoLayout};
pub use repo::Repository;
