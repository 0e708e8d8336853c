//! End-to-end integration test of a release circuit build
//!
//! Exercises the complete flow: manifest loading -> strict context
//! construction -> environments -> command lines -> network config.

use circuit_core::{CircuitMode, Config, Context, NetworkConfig, ValidationGates};
use circuit_fs::DocumentStore;
use circuit_test_utils::{Layout, TestBioname};
use pretty_assertions::assert_eq;

fn committed_release() -> TestBioname {
    TestBioname::builder(Layout::Release)
        .section(
            "spykfunc_s2f",
            "{filters: [BoutonDistance, TouchRules, SpineLength, ReduceAndCut, \
             SynapseReposition, SynapseProperties, AddID]}",
        )
        .section("modules", "['spykfunc:archive/2023-01,spykfunc/0.18.0']")
        .with_git()
        .build()
}

#[test]
fn test_release_build_flow() {
    let fixture = committed_release();

    let config = Config::load_manifest(fixture.bioname()).unwrap();
    let ctx = Context::new(config, ValidationGates::strict()).unwrap();
    assert_eq!(ctx.mode(), CircuitMode::Release);

    let spykfunc = ctx.environment("spykfunc").unwrap();
    assert_eq!(spykfunc.modules(), ["archive/2023-01", "spykfunc/0.18.0"]);

    let cmd = ctx.run_spykfunc("spykfunc_s2f").unwrap();
    assert!(cmd.contains(
        " --filters BoutonDistance,TouchRules,SpineLength,ReduceAndCut,\
         SynapseReposition,SynapseProperties,AddID "
    ));

    let output = fixture.circuit_dir().join("sonata/circuit_config.json");
    let written = ctx
        .write_network_config("functional", &output, false)
        .unwrap();

    let reloaded: NetworkConfig = DocumentStore::new().load(&output).unwrap();
    assert_eq!(reloaded, written);
    assert_eq!(
        reloaded.networks.nodes[0].nodes_file,
        "$BASE_DIR/sonata/networks/nodes/neocortex_neurons/nodes.h5"
    );
}

#[test]
fn test_outputs_outside_bioname_keep_it_clean() {
    let fixture = committed_release();
    let ctx = Context::new(
        Config::load_manifest(fixture.bioname()).unwrap(),
        ValidationGates::strict(),
    )
    .unwrap();

    ctx.write_network_config(
        "functional",
        &fixture.circuit_dir().join("circuit_config.json"),
        true,
    )
    .unwrap();

    // Rebuilding still passes the git check.
    Context::new(
        Config::load_manifest(fixture.bioname()).unwrap(),
        ValidationGates::strict(),
    )
    .unwrap();
}

#[test]
fn test_outputs_inside_bioname_fail_the_git_check() {
    let fixture = committed_release();
    let ctx = Context::new(
        Config::load_manifest(fixture.bioname()).unwrap(),
        ValidationGates::strict(),
    )
    .unwrap();

    ctx.write_network_config(
        "functional",
        &fixture.bioname().join("circuit_config.json"),
        false,
    )
    .unwrap();

    let err = Context::new(
        Config::load_manifest(fixture.bioname()).unwrap(),
        ValidationGates::strict(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("circuit_config.json"), "{err}");
}
