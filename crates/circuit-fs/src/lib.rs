//! Filesystem layer for circuit-build
//!
//! Provides placeholder-aware path resolution and safe document I/O.

pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::DocumentStore;
pub use constants::CircuitPath;
pub use error::{Error, Result};
pub use path::{BASE_DIR, abs_path, make_abs, normalize, to_base_dir};
