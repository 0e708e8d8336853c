//! Validation gates
//!
//! Which construction-time checks a [`Context`](crate::Context) runs. The
//! gates are plain data handed to the constructor; only
//! [`ValidationGates::from_env`] looks at the process environment.

/// Isolated phase: the context is rebuilt inside a single rule's job.
pub const ISOLATED_PHASE_VAR: &str = "ISOLATED_PHASE";
pub const SKIP_GIT_CHECK_VAR: &str = "CIRCUIT_BUILD_SKIP_GIT_CHECK";
pub const SKIP_CONFIG_VALIDATION_VAR: &str = "CIRCUIT_BUILD_SKIP_CONFIG_VALIDATION";
pub const SKIP_MORPHOLOGY_RELEASE_VALIDATION_VAR: &str =
    "CIRCUIT_BUILD_SKIP_MORPHOLOGY_RELEASE_VALIDATION";

/// Switches for the checks run while building a context.
///
/// The isolated phase implies every skip: the checks already ran when the
/// workflow was planned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationGates {
    pub isolated_phase: bool,
    pub skip_git_check: bool,
    pub skip_config_validation: bool,
    pub skip_morphology_release_validation: bool,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

impl ValidationGates {
    /// Every check enabled.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Gates of a job running inside the isolated phase.
    pub fn isolated() -> Self {
        Self {
            isolated_phase: true,
            ..Self::default()
        }
    }

    /// Read the gates from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the gates through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str| lookup(name).is_some_and(|value| is_truthy(&value));
        let gates = Self {
            isolated_phase: flag(ISOLATED_PHASE_VAR),
            skip_git_check: flag(SKIP_GIT_CHECK_VAR),
            skip_config_validation: flag(SKIP_CONFIG_VALIDATION_VAR),
            skip_morphology_release_validation: flag(SKIP_MORPHOLOGY_RELEASE_VALIDATION_VAR),
        };
        tracing::debug!(?gates, "Validation gates");
        gates
    }

    pub fn skips_git_check(&self) -> bool {
        self.isolated_phase || self.skip_git_check
    }

    pub fn skips_config_validation(&self) -> bool {
        self.isolated_phase || self.skip_config_validation
    }

    pub fn skips_morphology_release_validation(&self) -> bool {
        self.isolated_phase || self.skip_morphology_release_validation
    }
}
