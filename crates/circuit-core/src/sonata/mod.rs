//! SONATA network configs
//!
//! Paths produced inside the circuit directory are written relative to
//! `$BASE_DIR`; inputs living elsewhere (morphology and emodel releases,
//! vasculature) are written as absolute paths.

mod document;
mod writer;

pub use document::{
    AlternateMorphologies, EdgeGroup, EdgePopulation, EdgeType, Manifest, Metadata,
    NETWORK_CONFIG_VERSION, NetworkConfig, Networks, NodeGroup, NodePopulation, NodeType,
    Provenance,
};
