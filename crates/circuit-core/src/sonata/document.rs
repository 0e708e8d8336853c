//! SONATA network config document

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const NETWORK_CONFIG_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub status: String,
}

impl Metadata {
    pub fn partial() -> Self {
        Self {
            status: "partial".to_string(),
        }
    }
}

/// Path substitutions applied by readers of the config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "$BASE_DIR")]
    pub base_dir: String,
}

/// Circuit-building inputs a population was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub bioname_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Biophysical,
    Astrocyte,
    Vasculature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Chemical,
    SynapseAstrocyte,
    Glialglial,
    Endfoot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlternateMorphologies {
    pub h5v1: String,
    #[serde(
        rename = "neurolucida-asc",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub neurolucida_asc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePopulation {
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_segment_index_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_morphologies: Option<AlternateMorphologies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biophysical_neuron_models_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub microdomains_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vasculature_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vasculature_mesh: Option<String>,
    pub provenance: Provenance,
}

impl NodePopulation {
    /// A population with only its type and provenance set.
    pub fn new(kind: NodeType, provenance: Provenance) -> Self {
        Self {
            kind,
            spatial_segment_index_dir: None,
            alternate_morphologies: None,
            biophysical_neuron_models_dir: None,
            microdomains_file: None,
            vasculature_file: None,
            vasculature_mesh: None,
            provenance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgePopulation {
    #[serde(rename = "type")]
    pub kind: EdgeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial_synapse_index_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endfeet_meshes_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spine_morphologies_dir: Option<String>,
    pub provenance: Provenance,
}

impl EdgePopulation {
    pub fn new(kind: EdgeType, provenance: Provenance) -> Self {
        Self {
            kind,
            spatial_synapse_index_dir: None,
            endfeet_meshes_file: None,
            spine_morphologies_dir: None,
            provenance,
        }
    }
}

/// One nodes file and the populations stored in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeGroup {
    pub nodes_file: String,
    pub populations: BTreeMap<String, NodePopulation>,
}

impl NodeGroup {
    pub fn single(nodes_file: String, name: &str, population: NodePopulation) -> Self {
        Self {
            nodes_file,
            populations: BTreeMap::from([(name.to_string(), population)]),
        }
    }
}

/// One edges file and the populations stored in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeGroup {
    pub edges_file: String,
    pub populations: BTreeMap<String, EdgePopulation>,
}

impl EdgeGroup {
    pub fn single(edges_file: String, name: &str, population: EdgePopulation) -> Self {
        Self {
            edges_file,
            populations: BTreeMap::from([(name.to_string(), population)]),
        }
    }
}

/// Node and edge groups, in the order downstream tools read them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    pub nodes: Vec<NodeGroup>,
    pub edges: Vec<EdgeGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub manifest: Manifest,
    pub node_sets_file: String,
    pub networks: Networks,
}
