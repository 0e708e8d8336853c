//! Well-known file and directory names of a circuit build.

use std::path::Path;

/// Standard locations inside the bioname and circuit directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitPath {
    /// The build manifest in the bioname directory
    Manifest,
    /// Environment overrides in the bioname directory
    Environments,
    /// Connectome recipe in the bioname directory
    BuilderRecipe,
    /// Morphology database in the bioname directory
    MorphDb,
    /// Synthesis protocol config in the bioname directory
    SynthesisProtocolConfig,
    /// Axon morphology database used by synthesis, in the bioname directory
    SynthesisMorphDb,
    /// SONATA output root in the circuit directory
    Sonata,
    /// Node sets file in the circuit directory
    NodeSets,
    /// Log directory in the circuit directory
    Logs,
    /// Neuron models produced by synthesis, in the circuit directory
    HocFiles,
    /// Synthesized morphologies root in the circuit directory
    Morphologies,
    /// Default atlas cache directory
    AtlasCache,
}

impl CircuitPath {
    /// Get the string representation of the path.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manifest => "MANIFEST.yaml",
            Self::Environments => "environments.yaml",
            Self::BuilderRecipe => "builderRecipeAllPathways.xml",
            Self::MorphDb => "extNeuronDB.dat",
            Self::SynthesisProtocolConfig => "protocol_config.yaml",
            Self::SynthesisMorphDb => "neurondb-axon.dat",
            Self::Sonata => "sonata",
            Self::NodeSets => "sonata/node_sets.json",
            Self::Logs => "logs",
            Self::HocFiles => "hoc_files",
            Self::Morphologies => "morphologies",
            Self::AtlasCache => ".atlas",
        }
    }
}

impl AsRef<Path> for CircuitPath {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for CircuitPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for CircuitPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
