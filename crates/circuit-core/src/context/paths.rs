//! Derived path rule sets

use crate::config::Config;
use crate::gates::ValidationGates;
use crate::mode::CircuitMode;
use crate::{Error, Result};
use circuit_fs::{CircuitPath, abs_path};
use std::path::{Path, PathBuf};

/// Directories every build works with, all absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub bioname_dir: PathBuf,
    pub circuit_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl Paths {
    /// Resolve `bioname` and `circuit_dir` against the working directory.
    pub fn new(bioname: &str, circuit_dir: &str) -> Self {
        let bioname_dir = abs_path(".", bioname);
        let circuit_dir = abs_path(".", circuit_dir);
        let logs_dir = circuit_dir.join(CircuitPath::Logs);
        Self {
            bioname_dir,
            circuit_dir,
            logs_dir,
        }
    }

    /// A manifest path relative to the bioname directory.
    pub fn bioname_path(&self, path: impl AsRef<Path>) -> PathBuf {
        abs_path(&self.bioname_dir, path)
    }

    /// A manifest path relative to the circuit directory.
    pub fn circuit_path(&self, path: impl AsRef<Path>) -> PathBuf {
        abs_path(&self.circuit_dir, path)
    }
}

/// Emodel release files used by release-mode circuits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmodelRelease {
    pub dir: PathBuf,
    pub mecombo: PathBuf,
    pub hoc: PathBuf,
}

impl EmodelRelease {
    pub fn new(dir: PathBuf) -> Self {
        let mecombo = dir.join("mecombo_emodel.tsv");
        let hoc = dir.join("hoc");
        Self { dir, mecombo, hoc }
    }

    fn check_exists(&self) -> Result<()> {
        let missing: Vec<PathBuf> = [&self.mecombo, &self.hoc]
            .into_iter()
            .filter(|path| !path.exists())
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingEmodelFiles { missing })
        }
    }
}

/// Where neuron morphologies and models come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NeuronSources {
    /// Released morphologies and emodels outside the circuit directory.
    Release {
        morph_release: Option<PathBuf>,
        emodel_release: Option<EmodelRelease>,
    },
    /// Morphologies and models produced inside the circuit directory.
    Synthesized {
        morph_dir: PathBuf,
        hoc_dir: PathBuf,
        emodel_release: Option<PathBuf>,
    },
}

impl NeuronSources {
    pub(crate) fn resolve(
        config: &Config,
        paths: &Paths,
        mode: CircuitMode,
        gates: &ValidationGates,
        synthesize_morph_dir: &Path,
    ) -> Result<Self> {
        let bioname_path = |key: &str| {
            config
                .get_non_empty_str(&["common", key])
                .map(|value| paths.bioname_path(value))
        };
        if mode.synthesize() {
            return Ok(Self::Synthesized {
                morph_dir: synthesize_morph_dir.to_path_buf(),
                hoc_dir: paths.circuit_dir.join(CircuitPath::HocFiles),
                emodel_release: bioname_path("synthesize_emodel_release"),
            });
        }

        let emodel_release = bioname_path("emodel_release").map(EmodelRelease::new);
        if let Some(release) = &emodel_release
            && !gates.isolated_phase
        {
            release.check_exists()?;
        }
        Ok(Self::Release {
            morph_release: bioname_path("morph_release"),
            emodel_release,
        })
    }
}

/// Vasculature inputs of an NGV circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vasculature {
    pub file: PathBuf,
    pub mesh: PathBuf,
}

impl Vasculature {
    /// Explicit `ngv.common` entries win; otherwise the files sit in the NGV
    /// atlas, which is the circuit atlas in full mode and `ngv.common.atlas`
    /// in standalone mode.
    pub(crate) fn resolve(
        config: &Config,
        paths: &Paths,
        mode: CircuitMode,
        atlas: Option<&Path>,
    ) -> Result<Self> {
        let ngv_atlas = match mode {
            CircuitMode::NgvStandalone => config
                .get_non_empty_str(&["ngv", "common", "atlas"])
                .map(|atlas| paths.bioname_path(atlas)),
            _ => atlas.map(Path::to_path_buf),
        };
        let locate = |key: &str, default_name: &str| -> Result<PathBuf> {
            if let Some(value) = config.get_non_empty_str(&["ngv", "common", key]) {
                return Ok(paths.bioname_path(value));
            }
            ngv_atlas
                .as_ref()
                .map(|atlas| atlas.join(default_name))
                .ok_or_else(|| Error::missing_key(format!("ngv.common.{key}")))
        };
        Ok(Self {
            file: locate("vasculature", "vasculature.h5")?,
            mesh: locate("vasculature_mesh", "vasculature.obj")?,
        })
    }
}
