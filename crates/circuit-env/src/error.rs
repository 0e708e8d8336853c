//! Error types for circuit-env

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "Invalid module specification '{spec}': expected 'tool:module[,module...][:modulepath]'"
    )]
    InvalidModuleSpec { spec: String },

    #[error(
        "Unknown env_type '{env_type}' for environment '{tool}' (expected MODULE, APPTAINER or VENV)"
    )]
    UnknownEnvType { tool: String, env_type: String },

    #[error("Unsupported version {version} of {path} (expected 1)")]
    UnsupportedVersion { path: PathBuf, version: u64 },

    #[error("Invalid override for environment '{tool}': {message}")]
    InvalidOverride { tool: String, message: String },

    #[error("Incomplete environment '{tool}': {message}")]
    IncompleteDescriptor { tool: String, message: String },

    #[error("Filesystem error: {0}")]
    Fs(#[from] circuit_fs::Error),
}
