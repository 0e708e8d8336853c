//! Environment registry - built-in descriptors and resolved lookups

mod builtins;
mod store;

pub use builtins::{
    APPTAINER_MODULEPATH, APPTAINER_MODULES, APPTAINER_OPTIONS, BUILTIN_COUNT, NIX_MODULEPATH,
    SPACK_MODULEPATH, builtin_environments,
};
pub use store::EnvRegistry;
