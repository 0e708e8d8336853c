//! Shared test utilities for the circuit-build workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`git`] - git repository fixtures built with `git2`
//! - [`bioname`] - [`TestBioname`] builder for bioname/circuit directory pairs

pub mod bioname;
pub mod git;

pub use bioname::{Layout, TestBioname, TestBionameBuilder};
