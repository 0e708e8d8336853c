//! Error types for circuit-git

use std::path::PathBuf;

/// Result type for circuit-git operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inspecting a work tree
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("{path} is not inside a git work tree")]
    NotARepository { path: PathBuf },

    #[error("{path} has uncommitted changes: {}", entries.join(", "))]
    DirtyWorkTree { path: PathBuf, entries: Vec<String> },
}
