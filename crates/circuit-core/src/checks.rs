//! Checks against the world outside the manifest

use crate::{Error, Result};
use std::path::Path;

/// Sub-directories every morphology release provides.
pub const MORPHOLOGY_RELEASE_FORMATS: &[&str] = &["h5v1", "ascii"];

/// External validations run while building a context.
pub trait BuildChecks {
    /// Validate a morphology release directory.
    fn morphology_release(&self, path: &Path) -> Result<()>;

    /// Validate that the bioname is committed.
    fn git_state(&self, bioname_dir: &Path) -> Result<()>;
}

/// Checks backed by the filesystem and git.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsChecks;

impl BuildChecks for FsChecks {
    fn morphology_release(&self, path: &Path) -> Result<()> {
        let missing: Vec<String> = MORPHOLOGY_RELEASE_FORMATS
            .iter()
            .filter(|format| !path.join(format).is_dir())
            .map(|format| format.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::InvalidMorphologyRelease {
                path: path.to_path_buf(),
                missing,
            });
        }
        tracing::debug!(path = %path.display(), "Morphology release is valid");
        Ok(())
    }

    fn git_state(&self, bioname_dir: &Path) -> Result<()> {
        circuit_git::check_clean(bioname_dir)?;
        Ok(())
    }
}
