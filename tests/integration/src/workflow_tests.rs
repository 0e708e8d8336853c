//! Scenarios spanning several workflow phases

use circuit_core::gates::{ISOLATED_PHASE_VAR, SKIP_GIT_CHECK_VAR};
use circuit_core::{CircuitMode, Config, Context, Error, ValidationGates};
use circuit_env::registry::SPACK_MODULEPATH;
use circuit_fs::make_abs;
use circuit_test_utils::{Layout, TestBioname};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

fn load(fixture: &TestBioname) -> Config {
    Config::load_manifest(fixture.bioname()).unwrap()
}

#[test]
fn test_isolated_phase_rebuilds_context_without_checks() {
    // Planning succeeded; the job then runs where emodels are not mounted.
    let fixture = TestBioname::builder(Layout::Release)
        .without_emodel_files()
        .build();

    assert!(matches!(
        Context::new(load(&fixture), ValidationGates::from_lookup(lookup(&[]))),
        Err(Error::MissingEmodelFiles { .. })
    ));

    let gates = ValidationGates::from_lookup(lookup(&[(ISOLATED_PHASE_VAR, "True")]));
    let ctx = Context::new(load(&fixture), gates).unwrap();
    assert!(ctx.run_spykfunc("spykfunc_s2s").unwrap().contains(" --s2s "));
}

#[test]
fn test_skip_git_check_from_environment() {
    let fixture = TestBioname::release();

    assert!(matches!(
        Context::new(load(&fixture), ValidationGates::strict()),
        Err(Error::Git(_))
    ));

    let gates = ValidationGates::from_lookup(lookup(&[(SKIP_GIT_CHECK_VAR, "1")]));
    Context::new(load(&fixture), gates).unwrap();
}

#[test]
fn test_environments_file_wins_over_manifest_modules() {
    let fixture = TestBioname::builder(Layout::Synthesis)
        .section("modules", "['brainbuilder:archive/2020-08,brainbuilder/0.14.0:/custom']")
        .build();
    fixture.write_environments(
        "version: 1\n\
         env_config:\n\
         \x20 brainbuilder:\n\
         \x20   modules: [brainbuilder/0.20.0]\n\
         \x20 region-grower:\n\
         \x20   env_type: VENV\n\
         \x20   path: /venvs/region-grower\n",
    );
    let gates = ValidationGates {
        skip_git_check: true,
        ..ValidationGates::default()
    };
    let ctx = Context::new(load(&fixture), gates).unwrap();

    let brainbuilder = ctx.environment("brainbuilder").unwrap();
    assert_eq!(brainbuilder.modules(), ["brainbuilder/0.20.0"]);
    assert_eq!(brainbuilder.modulepath(), Some("/custom"));

    let touchdetector = ctx.environment("touchdetector").unwrap();
    assert_eq!(touchdetector.modulepath(), Some(SPACK_MODULEPATH));

    let region_grower = ctx.environment("region-grower").unwrap();
    assert_eq!(region_grower.env_type().as_str(), "VENV");
    assert!(region_grower.modules().is_empty());
}

#[test]
fn test_manifest_paths_resolve_like_make_abs() {
    let fixture = TestBioname::ngv_standalone();
    let gates = ValidationGates {
        skip_git_check: true,
        ..ValidationGates::default()
    };
    let ctx = Context::new(load(&fixture), gates).unwrap();

    assert_eq!(ctx.mode(), CircuitMode::NgvStandalone);
    let vasculature = ctx.vasculature().unwrap();
    assert_eq!(
        vasculature.file.to_string_lossy(),
        make_abs(fixture.bioname(), "../data/atlas/vasculature.h5")
    );
    assert_eq!(make_abs(fixture.bioname(), "$CIRCUIT_DIR/x"), "$CIRCUIT_DIR/x");
}

#[test]
fn test_every_layout_builds_a_network_config() {
    let gates = ValidationGates {
        skip_git_check: true,
        ..ValidationGates::default()
    };
    for layout in [
        Layout::Release,
        Layout::Synthesis,
        Layout::NgvFull,
        Layout::NgvStandalone,
    ] {
        let fixture = TestBioname::builder(layout).build();
        let ctx = Context::new(load(&fixture), gates).unwrap();

        let document = if ctx.mode().is_ngv() {
            ctx.network_ngv_config(false).unwrap()
        } else {
            ctx.network_config("functional", false).unwrap()
        };

        let expected_groups = if ctx.mode().is_ngv() { (3, 4) } else { (1, 1) };
        assert_eq!(
            (document.networks.nodes.len(), document.networks.edges.len()),
            expected_groups,
            "{layout:?}"
        );
    }
}
