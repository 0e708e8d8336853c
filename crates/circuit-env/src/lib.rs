//! Tool environments for circuit-build
//!
//! Every external tool invoked by the pipeline runs in an environment: a set
//! of environment modules, a container image, or a Python virtualenv. This
//! crate owns the built-in registry of those environments and the layered
//! overrides that a bioname can apply on top of it:
//!
//! 1. **Built-ins** - [`registry::builtin_environments`]
//! 2. **Manifest modules** - `modules: ["tool:mod1,mod2[:modulepath]"]`
//! 3. **environments.yaml** - full descriptors and `env_vars` per tool
//!
//! Later layers win. See [`merge`] for the per-field precedence.

pub mod error;
pub mod merge;
pub mod overrides;
pub mod registry;
pub mod types;

pub use error::{Error, Result};
pub use overrides::{EnvironmentsDocument, ModuleSpec, OverrideLayer};
pub use registry::{BUILTIN_COUNT, EnvRegistry, builtin_environments};
pub use types::{EnvKind, EnvType, EnvVars, EnvironmentDescriptor};
