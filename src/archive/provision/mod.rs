// gitarchive: archive test results into Git
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository provisioning.
//!
//! ```text
//! path is a file              --> NotADirectory
//! path missing or empty dir   --> init (or NoRepo if creation disallowed)
//! path is a repository top    --> open
//! anything else               --> NotARepository
//! ```

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{ArchiveResult, RepoError};
use crate::git::{GitBackend, Repository};

fn is_empty_dir(path: &Path) -> std::io::Result<bool> {
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Open the repository at `path`, creating it first when it is missing or
/// an empty directory and `allow_create` is set.
///
/// Calling this twice on the same path yields the same repository.
///
/// # Errors
///
/// Returns `ArchiveError::Repo` describing why `path` cannot be used.
pub fn provision<'b>(
    backend: &'b dyn GitBackend,
    path: &Path,
    allow_create: bool,
    bare: bool,
) -> ArchiveResult<Repository<'b>> {
    let path = std::path::absolute(path)?;
    let shown = path.display().to_string();

    let exists = path.exists();
    if exists && !path.is_dir() {
        return Err(RepoError::NotADirectory { path: shown }.into());
    }

    if !exists || is_empty_dir(&path)? {
        if !allow_create {
            return Err(RepoError::NoRepo { path: shown }.into());
        }
        if !exists {
            fs::create_dir_all(&path).map_err(|source| RepoError::CreateDir {
                path: shown.clone(),
                source,
            })?;
        }
        info!(path = %shown, bare, "creating Git repository");
        backend
            .init_repo(&path, bare)
            .map_err(|source| RepoError::Init {
                path: shown.clone(),
                source,
            })?;
    }

    Repository::open(backend, &path).map_err(|e| {
        debug!(path = %shown, error = %e, "failed to open repository");
        RepoError::NotARepository { path: shown }.into()
    })
}
