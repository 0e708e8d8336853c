//! Shape validation of a build manifest

use super::{Config, KeyPath};
use crate::spykfunc::SpykfuncRule;
use crate::{Error, Result};
use serde_yaml::Value;

fn expect_mapping_if_present<K: KeyPath + ?Sized>(config: &Config, keys: &K) -> Result<()> {
    match config.get(keys) {
        None | Some(Value::Null) | Some(Value::Mapping(_)) => Ok(()),
        Some(_) => Err(Error::invalid_manifest(keys.dotted(), "expected a mapping")),
    }
}

fn expect_string_if_present<K: KeyPath + ?Sized>(config: &Config, keys: &K) -> Result<()> {
    match config.get(keys) {
        None | Some(Value::Null) | Some(Value::String(_)) => Ok(()),
        Some(_) => Err(Error::invalid_manifest(keys.dotted(), "expected a string")),
    }
}

/// Check the types of the manifest entries the build context reads.
pub fn validate_manifest(config: &Config) -> Result<()> {
    if config.get_str(super::BIONAME_KEY).is_none() {
        return Err(Error::missing_key(super::BIONAME_KEY));
    }
    expect_string_if_present(config, "circuit_dir")?;

    expect_mapping_if_present(config, "common")?;
    for key in [
        "atlas",
        "morph_release",
        "emodel_release",
        "synthesize_emodel_release",
        "node_population_name",
        "edge_population_name",
        "spine_morphologies_dir",
        "atlas_cache_dir",
    ] {
        expect_string_if_present(config, &["common", key])?;
    }
    if !matches!(
        config.get(&["common", "synthesis"]),
        None | Some(Value::Null) | Some(Value::Bool(_))
    ) {
        return Err(Error::invalid_manifest("common.synthesis", "expected a boolean"));
    }
    config.get_str_list(&["common", "partition"])?;
    config.get_str_list("modules")?;

    for rule in SpykfuncRule::ALL {
        expect_mapping_if_present(config, rule.name())?;
        config.get_str_list(&[rule.name(), "filters"])?;
        expect_string_if_present(config, &[rule.name(), "extra_args"])?;
    }

    expect_mapping_if_present(config, "synthesize_morphologies")?;
    expect_string_if_present(config, &["synthesize_morphologies", "morph_dir"])?;
    expect_string_if_present(config, &["synthesize_morphologies", "morphdb"])?;

    expect_mapping_if_present(config, "ngv")?;
    expect_mapping_if_present(config, &["ngv", "common"])?;
    for key in ["atlas", "vasculature", "vasculature_mesh"] {
        expect_string_if_present(config, &["ngv", "common", key])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn manifest(body: &str) -> Config {
        Config::from_yaml_str(&format!("bioname: /bioname\n{body}")).unwrap()
    }

    #[test]
    fn test_minimal_manifest_is_valid() {
        validate_manifest(&manifest("common: {atlas: entities/atlas}\n")).unwrap();
    }

    #[test]
    fn test_bioname_is_required() {
        let config = Config::from_yaml_str("common: {}\n").unwrap();
        assert!(matches!(
            validate_manifest(&config),
            Err(Error::MissingKey { ref key }) if key == "bioname"
        ));
    }

    #[rstest]
    #[case("common: [a]\n", "common")]
    #[case("common: {synthesis: 'yes'}\n", "common.synthesis")]
    #[case("common: {partition: left}\n", "common.partition")]
    #[case("modules: brainbuilder:x\n", "modules")]
    #[case("spykfunc_s2s: {filters: [BoutonDistance, 3]}\n", "spykfunc_s2s.filters")]
    #[case("spykfunc_merge: {extra_args: [a]}\n", "spykfunc_merge.extra_args")]
    #[case("ngv: {common: {atlas: 3}}\n", "ngv.common.atlas")]
    #[case("synthesize_morphologies: true\n", "synthesize_morphologies")]
    fn test_invalid_entries_name_the_key(#[case] body: &str, #[case] expected_key: &str) {
        match validate_manifest(&manifest(body)) {
            Err(Error::InvalidManifest { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected InvalidManifest for {expected_key}, got {other:?}"),
        }
    }
}
