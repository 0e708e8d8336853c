//! Network config writers

use super::document::{
    AlternateMorphologies, EdgeGroup, EdgePopulation, EdgeType, Manifest, Metadata,
    NETWORK_CONFIG_VERSION, NetworkConfig, Networks, NodeGroup, NodePopulation, NodeType,
};
use crate::context::{Context, NeuronSources};
use crate::{Error, Result};
use circuit_fs::{CircuitPath, DocumentStore, to_base_dir};
use std::path::{Path, PathBuf};

const ASTROCYTES: &str = "astrocytes";
const VASCULATURE: &str = "vasculature";
const NEUROGLIAL: &str = "neuroglial";
const GLIALGLIAL: &str = "glialglial";
const GLIOVASCULAR: &str = "gliovascular";

fn absolute(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Context {
    fn base(&self, path: &Path) -> String {
        to_base_dir(&self.paths().circuit_dir, path)
    }

    fn nodes_dir(&self, population: &str) -> PathBuf {
        self.paths()
            .circuit_dir
            .join(CircuitPath::Sonata)
            .join("networks/nodes")
            .join(population)
    }

    fn edges_dir(&self, subdir: &str) -> PathBuf {
        self.paths()
            .circuit_dir
            .join(CircuitPath::Sonata)
            .join("networks/edges")
            .join(subdir)
    }

    fn document(&self, is_partial_config: bool, networks: Networks) -> NetworkConfig {
        NetworkConfig {
            version: NETWORK_CONFIG_VERSION,
            metadata: is_partial_config.then(Metadata::partial),
            manifest: Manifest {
                base_dir: ".".to_string(),
            },
            node_sets_file: self.base(self.nodesets_file()),
            networks,
        }
    }

    fn neuron_nodes(&self) -> Result<NodeGroup> {
        let name = self.nodes_neurons_name();
        let dir = self.nodes_dir(name);
        let (morphologies, models_dir) = match self.neurons() {
            NeuronSources::Release { morph_release, .. } => {
                let morph_release = morph_release
                    .as_deref()
                    .ok_or_else(|| Error::missing_key("common.morph_release"))?;
                let hoc = self
                    .emodel_release_hoc()
                    .ok_or_else(|| Error::missing_key("common.emodel_release"))?;
                let morphologies = AlternateMorphologies {
                    h5v1: absolute(&morph_release.join("h5v1")),
                    neurolucida_asc: Some(absolute(&morph_release.join("ascii"))),
                };
                (morphologies, absolute(hoc))
            }
            NeuronSources::Synthesized {
                morph_dir, hoc_dir, ..
            } => {
                let morph_dir = self.base(morph_dir);
                let morphologies = AlternateMorphologies {
                    h5v1: morph_dir.clone(),
                    neurolucida_asc: Some(morph_dir),
                };
                (morphologies, self.base(hoc_dir))
            }
        };

        let mut population = NodePopulation::new(NodeType::Biophysical, self.provenance());
        population.spatial_segment_index_dir = Some(self.base(&dir.join("spatial_segment_index")));
        population.alternate_morphologies = Some(morphologies);
        population.biophysical_neuron_models_dir = Some(models_dir);
        Ok(NodeGroup::single(
            self.base(&dir.join("nodes.h5")),
            name,
            population,
        ))
    }

    fn chemical_edges(&self, connectome_dir: &str) -> EdgeGroup {
        let name = self.edges_neurons_neurons_name();
        let dir = self.edges_dir(connectome_dir).join(name);
        let mut population = EdgePopulation::new(EdgeType::Chemical, self.provenance());
        population.spatial_synapse_index_dir = Some(self.base(&dir.join("spatial_synapse_index")));
        population.spine_morphologies_dir = self.spine_morphologies_dir().map(str::to_string);
        EdgeGroup::single(self.base(&dir.join("edges.h5")), name, population)
    }

    fn astrocyte_nodes(&self) -> NodeGroup {
        let dir = self.nodes_dir(ASTROCYTES);
        let morphologies = self
            .paths()
            .circuit_dir
            .join(CircuitPath::Morphologies)
            .join(ASTROCYTES)
            .join("h5");
        let mut population = NodePopulation::new(NodeType::Astrocyte, self.provenance());
        population.alternate_morphologies = Some(AlternateMorphologies {
            h5v1: self.base(&morphologies),
            neurolucida_asc: None,
        });
        population.microdomains_file = Some(self.base(&dir.join("microdomains.h5")));
        NodeGroup::single(self.base(&dir.join("nodes.h5")), ASTROCYTES, population)
    }

    fn vasculature_nodes(&self) -> Result<NodeGroup> {
        let vasculature = self.vasculature().ok_or_else(|| Error::UnsupportedMode {
            operation: "write_network_ngv_config",
            mode: self.mode(),
        })?;
        let mut population = NodePopulation::new(NodeType::Vasculature, self.provenance());
        population.vasculature_file = Some(absolute(&vasculature.file));
        population.vasculature_mesh = Some(absolute(&vasculature.mesh));
        Ok(NodeGroup::single(
            self.base(&self.nodes_dir(VASCULATURE).join("nodes.h5")),
            VASCULATURE,
            population,
        ))
    }

    fn glial_edges(&self, name: &str, kind: EdgeType) -> EdgeGroup {
        let dir = self.edges_dir(name);
        let mut population = EdgePopulation::new(kind, self.provenance());
        if kind == EdgeType::Endfoot {
            population.endfeet_meshes_file = Some(self.base(&dir.join("endfeet_meshes.h5")));
        }
        EdgeGroup::single(self.base(&dir.join("edges.h5")), name, population)
    }

    /// Network config of a single neuronal population and its chemical edges.
    pub fn network_config(
        &self,
        connectome_dir: &str,
        is_partial_config: bool,
    ) -> Result<NetworkConfig> {
        let networks = Networks {
            nodes: vec![self.neuron_nodes()?],
            edges: vec![self.chemical_edges(connectome_dir)],
        };
        Ok(self.document(is_partial_config, networks))
    }

    /// Network config of an NGV circuit.
    ///
    /// Nodes: neurons, astrocytes, vasculature. Edges: functional chemical,
    /// neuroglial, glialglial, gliovascular. Readers rely on this order.
    pub fn network_ngv_config(&self, is_partial_config: bool) -> Result<NetworkConfig> {
        if !self.mode().is_ngv() {
            return Err(Error::UnsupportedMode {
                operation: "write_network_ngv_config",
                mode: self.mode(),
            });
        }
        let networks = Networks {
            nodes: vec![
                self.neuron_nodes()?,
                self.astrocyte_nodes(),
                self.vasculature_nodes()?,
            ],
            edges: vec![
                self.chemical_edges("functional"),
                self.glial_edges(NEUROGLIAL, EdgeType::SynapseAstrocyte),
                self.glial_edges(GLIALGLIAL, EdgeType::Glialglial),
                self.glial_edges(GLIOVASCULAR, EdgeType::Endfoot),
            ],
        };
        Ok(self.document(is_partial_config, networks))
    }

    /// Write [`Context::network_config`] to `output_file`.
    ///
    /// The format follows the extension; circuit configs are `.json`.
    pub fn write_network_config(
        &self,
        connectome_dir: &str,
        output_file: &Path,
        is_partial_config: bool,
    ) -> Result<NetworkConfig> {
        let document = self.network_config(connectome_dir, is_partial_config)?;
        write_document(output_file, &document)?;
        Ok(document)
    }

    /// Write [`Context::network_ngv_config`] to `output_file`.
    pub fn write_network_ngv_config(
        &self,
        output_file: &Path,
        is_partial_config: bool,
    ) -> Result<NetworkConfig> {
        let document = self.network_ngv_config(is_partial_config)?;
        write_document(output_file, &document)?;
        Ok(document)
    }
}

fn write_document(output_file: &Path, document: &NetworkConfig) -> Result<()> {
    DocumentStore::new().save(output_file, document)?;
    tracing::info!(
        path = %output_file.display(),
        nodes = document.networks.nodes.len(),
        edges = document.networks.edges.len(),
        "Wrote network config"
    );
    Ok(())
}
