//! Build context
//!
//! A [`Context`] is built once per build invocation from a loaded
//! [`Config`]. Every path the build rules use is derived during
//! construction; afterwards the context is read-only.
//!
//! Construction order:
//!
//! 1. manifest shape validation (unless gated off)
//! 2. bioname, circuit and logs directories
//! 3. [`CircuitMode`] selection
//! 4. mode-specific neuron sources, population names, atlas and NGV inputs
//! 5. morphology-release and git-state checks (unless gated off)

mod paths;

pub use paths::{EmodelRelease, NeuronSources, Paths, Vasculature};

use crate::checks::{BuildChecks, FsChecks};
use crate::config::{BIONAME_KEY, Config, validate_manifest};
use crate::gates::ValidationGates;
use crate::mode::CircuitMode;
use crate::sonata::Provenance;
use crate::spykfunc::{self, FilterConditions, SpykfuncInvocation, SpykfuncRule};
use crate::{Error, Result};
use circuit_env::{EnvRegistry, EnvironmentDescriptor, EnvironmentsDocument, OverrideLayer};
use circuit_fs::CircuitPath;
use std::path::{Path, PathBuf};

pub const DEFAULT_NODE_POPULATION: &str = "neocortex_neurons";
pub const DEFAULT_ATLAS_CACHE_DIR: &str = CircuitPath::AtlasCache.as_str();

/// Resolved, immutable view of one circuit build.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    config: Config,
    gates: ValidationGates,
    mode: CircuitMode,
    paths: Paths,
    builder_recipe: PathBuf,
    morphdb: PathBuf,
    synthesize_protocol_config: PathBuf,
    nodes_neurons_name: String,
    edges_neurons_neurons_name: String,
    synthesize_morph_dir: PathBuf,
    synthesize_morphdb: PathBuf,
    neurons: NeuronSources,
    partition: Vec<String>,
    atlas: Option<PathBuf>,
    atlas_cache_dir: String,
    nodesets_file: PathBuf,
    vasculature: Option<Vasculature>,
}

impl Context {
    /// Build a context with the filesystem and git checks.
    pub fn new(config: Config, gates: ValidationGates) -> Result<Self> {
        Self::with_checks(config, gates, &FsChecks)
    }

    /// Build a context with custom external checks.
    pub fn with_checks(
        config: Config,
        gates: ValidationGates,
        checks: &dyn BuildChecks,
    ) -> Result<Self> {
        if !gates.skips_config_validation() {
            validate_manifest(&config)?;
        }

        let bioname = config
            .get_non_empty_str(BIONAME_KEY)
            .ok_or_else(|| Error::missing_key(BIONAME_KEY))?;
        let paths = Paths::new(bioname, config.get_non_empty_str("circuit_dir").unwrap_or("."));
        let mode = CircuitMode::from_config(&config)?;

        let nodes_neurons_name = config
            .get_non_empty_str(&["common", "node_population_name"])
            .unwrap_or(DEFAULT_NODE_POPULATION)
            .to_string();
        let edges_neurons_neurons_name = config
            .get_non_empty_str(&["common", "edge_population_name"])
            .map(str::to_string)
            .unwrap_or_else(|| format!("{nodes_neurons_name}__chemical_synapse"));

        let synthesize_morph_dir =
            match config.get_non_empty_str(&["synthesize_morphologies", "morph_dir"]) {
                Some(dir) => paths.circuit_path(dir),
                None => paths
                    .circuit_dir
                    .join(CircuitPath::Morphologies)
                    .join(&nodes_neurons_name),
            };
        let synthesize_morphdb = paths.bioname_path(
            config
                .get_non_empty_str(&["synthesize_morphologies", "morphdb"])
                .unwrap_or(CircuitPath::SynthesisMorphDb.as_str()),
        );

        let neurons = NeuronSources::resolve(&config, &paths, mode, &gates, &synthesize_morph_dir)?;
        let partition = config
            .get_str_list(&["common", "partition"])?
            .unwrap_or_default();
        let atlas = config
            .get_non_empty_str(&["common", "atlas"])
            .map(|atlas| paths.bioname_path(atlas));
        let atlas_cache_dir = config
            .get_non_empty_str(&["common", "atlas_cache_dir"])
            .unwrap_or(DEFAULT_ATLAS_CACHE_DIR)
            .to_string();
        let vasculature = if mode.is_ngv() {
            Some(Vasculature::resolve(&config, &paths, mode, atlas.as_deref())?)
        } else {
            None
        };

        let context = Self {
            builder_recipe: paths.bioname_dir.join(CircuitPath::BuilderRecipe),
            morphdb: paths.bioname_dir.join(CircuitPath::MorphDb),
            synthesize_protocol_config: paths
                .bioname_dir
                .join(CircuitPath::SynthesisProtocolConfig),
            nodesets_file: paths.circuit_dir.join(CircuitPath::NodeSets),
            config,
            gates,
            mode,
            paths,
            nodes_neurons_name,
            edges_neurons_neurons_name,
            synthesize_morph_dir,
            synthesize_morphdb,
            neurons,
            partition,
            atlas,
            atlas_cache_dir,
            vasculature,
        };
        tracing::debug!(
            mode = %context.mode,
            bioname = %context.paths.bioname_dir.display(),
            circuit = %context.paths.circuit_dir.display(),
            "Resolved build context"
        );

        context.run_checks(checks)?;
        Ok(context)
    }

    fn run_checks(&self, checks: &dyn BuildChecks) -> Result<()> {
        if let Some(morph_release) = self.morph_release()
            && !self.gates.skips_morphology_release_validation()
        {
            checks.morphology_release(morph_release)?;
        }
        if !self.gates.skips_git_check() {
            checks.git_state(&self.paths.bioname_dir)?;
        }
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gates(&self) -> &ValidationGates {
        &self.gates
    }

    pub fn mode(&self) -> CircuitMode {
        self.mode
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn synthesize(&self) -> bool {
        self.mode.synthesize()
    }

    pub fn is_ngv_standalone(&self) -> bool {
        self.mode.is_ngv_standalone()
    }

    pub fn is_ngv_full(&self) -> bool {
        self.mode.is_ngv_full()
    }

    pub fn builder_recipe(&self) -> &Path {
        &self.builder_recipe
    }

    pub fn morphdb(&self) -> &Path {
        &self.morphdb
    }

    pub fn synthesize_protocol_config(&self) -> &Path {
        &self.synthesize_protocol_config
    }

    pub fn nodes_neurons_name(&self) -> &str {
        &self.nodes_neurons_name
    }

    pub fn edges_neurons_neurons_name(&self) -> &str {
        &self.edges_neurons_neurons_name
    }

    /// Output directory of synthesized morphologies.
    pub fn synthesize_morph_dir(&self) -> &Path {
        &self.synthesize_morph_dir
    }

    pub fn synthesize_morphdb(&self) -> &Path {
        &self.synthesize_morphdb
    }

    pub fn neurons(&self) -> &NeuronSources {
        &self.neurons
    }

    /// Released morphologies (release mode only).
    pub fn morph_release(&self) -> Option<&Path> {
        match &self.neurons {
            NeuronSources::Release { morph_release, .. } => morph_release.as_deref(),
            NeuronSources::Synthesized { .. } => None,
        }
    }

    fn emodel(&self) -> Option<&EmodelRelease> {
        match &self.neurons {
            NeuronSources::Release { emodel_release, .. } => emodel_release.as_ref(),
            NeuronSources::Synthesized { .. } => None,
        }
    }

    pub fn emodel_release(&self) -> Option<&Path> {
        self.emodel().map(|release| release.dir.as_path())
    }

    pub fn emodel_release_mecombo(&self) -> Option<&Path> {
        self.emodel().map(|release| release.mecombo.as_path())
    }

    pub fn emodel_release_hoc(&self) -> Option<&Path> {
        self.emodel().map(|release| release.hoc.as_path())
    }

    /// Emodels used to assign models to synthesized neurons.
    pub fn synthesize_emodel_release(&self) -> Option<&Path> {
        match &self.neurons {
            NeuronSources::Synthesized { emodel_release, .. } => emodel_release.as_deref(),
            NeuronSources::Release { .. } => None,
        }
    }

    /// Directory holding the neuron morphologies in h5 format.
    pub fn neuron_morphologies_h5(&self) -> Result<PathBuf> {
        match &self.neurons {
            NeuronSources::Release { morph_release, .. } => morph_release
                .as_ref()
                .map(|release| release.join("h5v1"))
                .ok_or_else(|| Error::missing_key("common.morph_release")),
            NeuronSources::Synthesized { morph_dir, .. } => Ok(morph_dir.clone()),
        }
    }

    pub fn partition(&self) -> &[String] {
        &self.partition
    }

    pub fn atlas(&self) -> Option<&Path> {
        self.atlas.as_deref()
    }

    /// Atlas cache directory, as written in the manifest.
    pub fn atlas_cache_dir(&self) -> &str {
        &self.atlas_cache_dir
    }

    pub fn nodesets_file(&self) -> &Path {
        &self.nodesets_file
    }

    /// Vasculature inputs (NGV modes only).
    pub fn vasculature(&self) -> Option<&Vasculature> {
        self.vasculature.as_ref()
    }

    /// `common.spine_morphologies_dir` when configured and non-empty.
    pub fn spine_morphologies_dir(&self) -> Option<&str> {
        self.config
            .get_non_empty_str(&["common", "spine_morphologies_dir"])
    }

    pub fn provenance(&self) -> Provenance {
        Provenance {
            bioname_dir: self.paths.bioname_dir.to_string_lossy().into_owned(),
        }
    }

    /// Resolve the tool environments: built-ins, then manifest `modules`,
    /// then `<bioname>/environments.yaml`.
    pub fn load_env_config(&self) -> Result<EnvRegistry> {
        let mut layers = Vec::new();
        if let Some(specs) = self.config.get_str_list("modules")? {
            layers.push(OverrideLayer::from_module_specs(&specs)?);
        }
        let environments = self.paths.bioname_dir.join(CircuitPath::Environments);
        if environments.is_file() {
            let document = EnvironmentsDocument::load(&environments)?;
            layers.push(OverrideLayer::from_document(&document)?);
        }
        Ok(EnvRegistry::resolve(&layers)?)
    }

    /// The resolved environment of one tool.
    pub fn environment(&self, tool: &str) -> Result<EnvironmentDescriptor> {
        self.load_env_config()?
            .get(tool)
            .cloned()
            .ok_or_else(|| Error::UnknownEnvironment {
                tool: tool.to_string(),
            })
    }

    /// Functionalizer command line of `rule`.
    pub fn run_spykfunc(&self, rule: &str) -> Result<String> {
        let rule: SpykfuncRule = rule.parse()?;
        let filters = self.config.get_str_list(&[rule.name(), "filters"])?;
        let extra_args = self
            .config
            .get_str(&[rule.name(), "extra_args"])
            .unwrap_or("");
        let morphologies = match rule.pipeline() {
            Some(_) => self.neuron_morphologies_h5()?.to_string_lossy().into_owned(),
            None => String::new(),
        };
        let recipe = self.builder_recipe.to_string_lossy();

        spykfunc::command(&SpykfuncInvocation {
            rule,
            extra_args,
            filters: filters.as_deref(),
            conditions: FilterConditions {
                spine_morphologies: self.spine_morphologies_dir().is_some(),
            },
            population: &self.nodes_neurons_name,
            recipe: &recipe,
            morphologies: &morphologies,
        })
    }
}
