//! Built-in tool environments
//!
//! This is the single source of truth for the environments used when a
//! bioname does not override them.

use crate::EnvironmentDescriptor;

pub const SPACK_MODULEPATH: &str = "/gpfs/bbp.cscs.ch/ssd/apps/bsd/modules/_meta";
pub const NIX_MODULEPATH: &str =
    "/nix/var/nix/profiles/per-user/modules/bb5-x86_64/modules-all/release/share/modulefiles/";
pub const APPTAINER_MODULEPATH: &str =
    "/gpfs/bbp.cscs.ch/apps/hpc/singularity/modules/linux-rhel7-x86_64";
pub const APPTAINER_MODULES: &[&str] = &["archive/2021-12", "singularityce"];
pub const APPTAINER_OPTIONS: &str =
    "--cleanenv --containall --bind $TMPDIR:/tmp,/gpfs/bbp.cscs.ch/project";

/// Number of built-in environments.
pub const BUILTIN_COUNT: usize = 12;

/// Returns all built-in environments keyed by tool name.
pub fn builtin_environments() -> Vec<(&'static str, EnvironmentDescriptor)> {
    vec![
        (
            "brainbuilder",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["archive/2022-03", "brainbuilder/0.17.0"],
            ),
        ),
        (
            "flatindexer",
            EnvironmentDescriptor::module(NIX_MODULEPATH, ["nix/hpc/flatindexer/1.8.12"]),
        ),
        (
            "parquet-converters",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["archive/2022-03", "parquet-converters/0.7.0"],
            ),
        ),
        (
            "placement-algorithm",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["archive/2022-03", "placement-algorithm/2.3.0"],
            ),
        ),
        (
            "spykfunc",
            EnvironmentDescriptor::module(SPACK_MODULEPATH, ["archive/2022-03", "spykfunc/0.17.1"]),
        ),
        (
            "touchdetector",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["archive/2022-03", "touchdetector/5.6.1"],
            ),
        ),
        (
            "region-grower",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["archive/2022-03", "py-region-grower/0.3.0"],
            ),
        ),
        (
            "bluepyemodel",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                [
                    "archive/2021-09",
                    "py-bluepyemodel/0.0.5",
                    "py-bglibpy/4.4.36",
                    "neurodamus-neocortex/1.4-3.3.2",
                ],
            ),
        ),
        (
            "emodel-generalisation",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["unstable", "py-emodel-generalisation", "neurodamus-neocortex"],
            )
            .with_env_var("NEURON_MODULE_OPTIONS", "-nogui"),
        ),
        (
            "ngv",
            EnvironmentDescriptor::module(SPACK_MODULEPATH, ["unstable", "py-archngv/2.0.1"]),
        ),
        (
            "synthesize-glia",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["unstable", "py-archngv/2.0.1", "py-mpi4py"],
            ),
        ),
        (
            "ngv-touchdetector",
            EnvironmentDescriptor::module(
                SPACK_MODULEPATH,
                ["unstable", "py-archngv/2.0.1", "touchdetector/5.6.1"],
            ),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_count_matches() {
        assert_eq!(builtin_environments().len(), BUILTIN_COUNT);
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let names: HashSet<_> = builtin_environments().iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), BUILTIN_COUNT);
    }

    #[test]
    fn test_builtins_have_modules() {
        for (name, descriptor) in builtin_environments() {
            assert!(!descriptor.modules().is_empty(), "{name} has no modules");
        }
    }
}
