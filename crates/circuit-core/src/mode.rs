//! Circuit build mode
//!
//! Selected once from the manifest when a context is built:
//!
//! | manifest                               | mode            |
//! |----------------------------------------|-----------------|
//! | `ngv` section and `common.atlas`       | `NgvFull`       |
//! | `ngv` section, no `common.atlas`       | `NgvStandalone` |
//! | `common.synthesis: true`               | `Synthesis`     |
//! | anything else                          | `Release`       |

use crate::config::Config;
use crate::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircuitMode {
    /// Neurons from a released morphology and emodel set.
    Release,
    /// Neurons with synthesized morphologies.
    Synthesis,
    /// Glia and vasculature without an underlying neuronal atlas.
    NgvStandalone,
    /// Glia and vasculature built on top of a neuronal circuit.
    NgvFull,
}

impl CircuitMode {
    /// Derive the mode of `config`.
    ///
    /// Standalone NGV needs its own atlas under `ngv.common.atlas`.
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.contains("ngv") {
            if config.get_non_empty_str(&["common", "atlas"]).is_some() {
                return Ok(Self::NgvFull);
            }
            if config.get_non_empty_str(&["ngv", "common", "atlas"]).is_none() {
                return Err(Error::missing_key("ngv.common.atlas"));
            }
            return Ok(Self::NgvStandalone);
        }
        if config.get_bool(&["common", "synthesis"]).unwrap_or(false) {
            Ok(Self::Synthesis)
        } else {
            Ok(Self::Release)
        }
    }

    /// Whether neuron morphologies and models are produced inside the circuit.
    pub fn synthesize(&self) -> bool {
        !matches!(self, Self::Release)
    }

    pub fn is_ngv(&self) -> bool {
        matches!(self, Self::NgvStandalone | Self::NgvFull)
    }

    pub fn is_ngv_standalone(&self) -> bool {
        matches!(self, Self::NgvStandalone)
    }

    pub fn is_ngv_full(&self) -> bool {
        matches!(self, Self::NgvFull)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Synthesis => "synthesis",
            Self::NgvStandalone => "ngv-standalone",
            Self::NgvFull => "ngv-full",
        }
    }
}

impl fmt::Display for CircuitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("common: {}\n", CircuitMode::Release)]
    #[case("common: {synthesis: false}\n", CircuitMode::Release)]
    #[case("common: {synthesis: true}\n", CircuitMode::Synthesis)]
    #[case("common: {atlas: a, synthesis: true}\nngv: {}\n", CircuitMode::NgvFull)]
    #[case("common: {atlas: a}\nngv: {common: {atlas: b}}\n", CircuitMode::NgvFull)]
    #[case("common: {}\nngv: {common: {atlas: ../data/atlas}}\n", CircuitMode::NgvStandalone)]
    fn test_mode_selection(#[case] yaml: &str, #[case] expected: CircuitMode) {
        let config = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(CircuitMode::from_config(&config).unwrap(), expected);
    }

    #[test]
    fn test_standalone_requires_ngv_atlas() {
        let config = Config::from_yaml_str("common: {}\nngv: {common: {}}\n").unwrap();
        assert!(matches!(
            CircuitMode::from_config(&config),
            Err(Error::MissingKey { ref key }) if key == "ngv.common.atlas"
        ));
    }

    #[test]
    fn test_derived_flags() {
        assert!(!CircuitMode::Release.synthesize());
        assert!(CircuitMode::Synthesis.synthesize());
        assert!(CircuitMode::NgvStandalone.synthesize());
        assert!(CircuitMode::NgvFull.is_ngv_full());
        assert!(!CircuitMode::NgvFull.is_ngv_standalone());
        assert!(!CircuitMode::Synthesis.is_ngv());
    }
}
