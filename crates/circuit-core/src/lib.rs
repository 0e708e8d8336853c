//! Build context resolution for circuit-build
//!
//! This crate turns a circuit-building manifest into everything the build
//! rules need:
//!
//! - **Config**: key-path access to `MANIFEST.yaml`
//! - **Context**: mode selection and derived paths, computed once
//! - **Environments**: per-tool environments with bioname overrides
//! - **Command builders**: functionalizer command lines with filter checks
//! - **Network configs**: SONATA circuit configs for release, synthesis and
//!   NGV circuits
//!
//! # Architecture
//!
//! ```text
//!                 workflow rules
//!                       |
//!                 circuit-core
//!                       |
//!      +----------------+----------------+
//!      |                |                |
//! circuit-fs       circuit-env      circuit-git
//! ```
//!
//! # Example
//!
//! ```no_run
//! use circuit_core::{Config, Context, Result, ValidationGates};
//! use std::path::Path;
//!
//! fn example() -> Result<()> {
//!     let config = Config::load_manifest(Path::new("bioname"))?;
//!     let context = Context::new(config, ValidationGates::from_env())?;
//!     let command = context.run_spykfunc("spykfunc_s2f")?;
//!     context.write_network_config("functional", Path::new("circuit_config.json"), false)?;
//!     println!("{command}");
//!     Ok(())
//! }
//! ```

pub mod checks;
pub mod config;
pub mod context;
pub mod error;
pub mod gates;
pub mod mode;
pub mod sonata;
pub mod spykfunc;

pub use checks::{BuildChecks, FsChecks};
pub use config::{Config, KeyPath};
pub use context::{Context, Paths};
pub use error::{Error, Result};
pub use gates::ValidationGates;
pub use mode::CircuitMode;
pub use sonata::{NetworkConfig, Provenance};
pub use spykfunc::SpykfuncRule;
