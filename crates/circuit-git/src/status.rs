//! Work-tree status of a directory inside a git repository

use std::path::{Path, PathBuf};

use git2::{ErrorCode, Repository, StatusOptions};

use crate::{Error, Result};

fn not_a_repository(path: &Path) -> Error {
    Error::NotARepository {
        path: path.to_path_buf(),
    }
}

/// Open the repository whose work tree contains `path`.
///
/// Returns the repository and `path` relative to its work tree.
fn open_containing(path: &Path) -> Result<(Repository, PathBuf)> {
    let canonical = dunce::canonicalize(path).map_err(|_| not_a_repository(path))?;
    let repo = Repository::discover(&canonical).map_err(|e| match e.code() {
        ErrorCode::NotFound => not_a_repository(path),
        _ => Error::Git(e),
    })?;
    let workdir = repo.workdir().ok_or_else(|| not_a_repository(path))?;
    let workdir = dunce::canonicalize(workdir).map_err(|_| not_a_repository(path))?;
    let relative = canonical
        .strip_prefix(&workdir)
        .map_err(|_| not_a_repository(path))?
        .to_path_buf();
    Ok((repo, relative))
}

/// Repository-relative paths under `path` that are modified, staged or untracked.
///
/// Ignored files do not count.
pub fn dirty_entries(path: &Path) -> Result<Vec<String>> {
    let (repo, relative) = open_containing(path)?;

    let mut opts = StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .exclude_submodules(true);
    if !relative.as_os_str().is_empty() {
        let pathspec: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        opts.pathspec(pathspec.join("/"));
    }

    let statuses = repo.statuses(Some(&mut opts))?;
    let entries: Vec<String> = statuses
        .iter()
        .filter(|entry| !entry.status().is_empty())
        .filter_map(|entry| entry.path().map(str::to_string))
        .collect();

    tracing::debug!(
        path = %path.display(),
        dirty = entries.len(),
        "Inspected work tree"
    );
    Ok(entries)
}

/// Fail unless `path` is inside a git work tree with nothing to commit under it.
pub fn check_clean(path: &Path) -> Result<()> {
    let entries = dirty_entries(path)?;
    if entries.is_empty() {
        Ok(())
    } else {
        Err(Error::DirtyWorkTree {
            path: path.to_path_buf(),
            entries,
        })
    }
}
