//! Error types for circuit-core

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::mode::CircuitMode;

/// Result type for circuit-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Render a set the way users read it in messages: `{'A', 'B'}`.
fn quoted_set(items: &BTreeSet<String>) -> String {
    let inner: Vec<String> = items.iter().map(|item| format!("'{item}'")).collect();
    format!("{{{}}}", inner.join(", "))
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur while resolving a build context
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Rule name not handled by the command builders
    #[error("Unrecognized rule '{rule}' in run_spykfunc")]
    UnknownRule { rule: String },

    /// User filter list lacks required stages
    #[error("{rule} should have filters {}", quoted_set(missing))]
    MissingFilters {
        rule: String,
        missing: BTreeSet<String>,
    },

    #[error("Missing emodel release files: {}", display_paths(missing))]
    MissingEmodelFiles { missing: Vec<PathBuf> },

    #[error("Invalid morphology release {path}: missing {}", missing.join(", "))]
    InvalidMorphologyRelease { path: PathBuf, missing: Vec<String> },

    #[error("Invalid manifest entry '{key}': {message}")]
    InvalidManifest { key: String, message: String },

    #[error("Missing manifest entry '{key}'")]
    MissingKey { key: String },

    #[error("{operation} is not available for {mode} circuits")]
    UnsupportedMode {
        operation: &'static str,
        mode: CircuitMode,
    },

    #[error("No environment configured for '{tool}'")]
    UnknownEnvironment { tool: String },

    // Transparent wrappers for underlying crate errors
    #[error(transparent)]
    Fs(#[from] circuit_fs::Error),

    #[error(transparent)]
    Env(#[from] circuit_env::Error),

    #[error(transparent)]
    Git(#[from] circuit_git::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    pub(crate) fn invalid_manifest(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            key: key.into(),
            message: message.into(),
        }
    }
}
