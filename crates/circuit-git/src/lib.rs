//! Git-state validation for circuit-build
//!
//! A bioname directory is expected to be version controlled so that a built
//! circuit can be traced back to the exact inputs that produced it. This crate
//! answers one question: is everything under a directory committed?

pub mod error;
pub mod status;

pub use error::{Error, Result};
pub use status::{check_clean, dirty_entries};
