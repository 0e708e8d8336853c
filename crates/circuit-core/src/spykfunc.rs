//! Functionalizer command lines
//!
//! The filter pipeline each rule must run is data: a canonical stage list per
//! rule plus stages that become required under a condition.

use crate::{Error, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Filter stages the functionalizer is known to provide.
pub const KNOWN_FILTERS: &[&str] = &[
    "AddID",
    "BoutonDistance",
    "DenseID",
    "GapJunction",
    "GapJunctionProperties",
    "ReduceAndCut",
    "SomaDistance",
    "SpineLength",
    "SpineMorphologies",
    "SynapseProperties",
    "SynapseReposition",
    "TouchReduction",
    "TouchRules",
];

pub const SPINE_MORPHOLOGIES_FILTER: &str = "SpineMorphologies";

/// Inputs that decide which conditional stages are required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterConditions {
    pub spine_morphologies: bool,
}

/// A stage required only when its condition holds.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalStage {
    pub name: &'static str,
    pub applies: fn(&FilterConditions) -> bool,
}

/// Required stages of a filter-running rule.
#[derive(Debug, Clone, Copy)]
pub struct FilterPipeline {
    /// Short flag selecting the canonical pipeline.
    pub flag: &'static str,
    pub canonical: &'static [&'static str],
    pub conditional: &'static [ConditionalStage],
}

const SPINE_STAGE: ConditionalStage = ConditionalStage {
    name: SPINE_MORPHOLOGIES_FILTER,
    applies: |conditions| conditions.spine_morphologies,
};

static S2S_PIPELINE: FilterPipeline = FilterPipeline {
    flag: "--s2s",
    canonical: &["BoutonDistance", "TouchRules", "SynapseProperties"],
    conditional: &[SPINE_STAGE],
};

static S2F_PIPELINE: FilterPipeline = FilterPipeline {
    flag: "--s2f",
    canonical: &[
        "BoutonDistance",
        "TouchRules",
        "SpineLength",
        "ReduceAndCut",
        "SynapseReposition",
        "SynapseProperties",
    ],
    conditional: &[SPINE_STAGE],
};

impl FilterPipeline {
    /// Canonical stages followed by the conditional stages that apply.
    pub fn required(&self, conditions: &FilterConditions) -> Vec<&'static str> {
        self.canonical
            .iter()
            .copied()
            .chain(
                self.conditional
                    .iter()
                    .filter(|stage| (stage.applies)(conditions))
                    .map(|stage| stage.name),
            )
            .collect()
    }

    /// Render the filter selection arguments.
    ///
    /// Without user filters the short flag is used, unless a conditional stage
    /// applies; the short flag cannot express those, so the full required list
    /// is spelled out instead. User filters must contain every required stage
    /// and are passed on in their given order.
    pub fn render(
        &self,
        rule: &str,
        configured: Option<&[String]>,
        conditions: &FilterConditions,
    ) -> Result<String> {
        let required = self.required(conditions);
        let configured = match configured {
            Some(filters) if !filters.is_empty() => filters,
            _ if required.len() == self.canonical.len() => return Ok(self.flag.to_string()),
            _ => return Ok(format!("--filters {}", required.join(","))),
        };

        let present: BTreeSet<&str> = configured.iter().map(String::as_str).collect();
        let missing: BTreeSet<String> = required
            .iter()
            .filter(|stage| !present.contains(**stage))
            .map(|stage| stage.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(Error::MissingFilters {
                rule: rule.to_string(),
                missing,
            });
        }

        for filter in configured {
            if !KNOWN_FILTERS.contains(&filter.as_str()) {
                tracing::warn!(rule, filter = %filter, "Unrecognized functionalizer filter");
            }
        }
        Ok(format!("--filters {}", configured.join(",")))
    }
}

/// Functionalizer rules of the build workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpykfuncRule {
    /// Structural connectome
    S2s,
    /// Functional connectome
    S2f,
    /// Merge of partial outputs
    Merge,
}

impl SpykfuncRule {
    pub const ALL: [Self; 3] = [Self::S2s, Self::S2f, Self::Merge];

    pub fn name(&self) -> &'static str {
        match self {
            Self::S2s => "spykfunc_s2s",
            Self::S2f => "spykfunc_s2f",
            Self::Merge => "spykfunc_merge",
        }
    }

    /// Filter pipeline of the rule; `Merge` runs none.
    pub fn pipeline(&self) -> Option<&'static FilterPipeline> {
        match self {
            Self::S2s => Some(&S2S_PIPELINE),
            Self::S2f => Some(&S2F_PIPELINE),
            Self::Merge => None,
        }
    }
}

impl FromStr for SpykfuncRule {
    type Err = Error;

    fn from_str(rule: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.name() == rule)
            .ok_or_else(|| Error::UnknownRule {
                rule: rule.to_string(),
            })
    }
}

impl fmt::Display for SpykfuncRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything the command template needs besides engine placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpykfuncInvocation<'a> {
    pub rule: SpykfuncRule,
    pub extra_args: &'a str,
    pub filters: Option<&'a [String]>,
    pub conditions: FilterConditions,
    pub population: &'a str,
    pub recipe: &'a str,
    pub morphologies: &'a str,
}

/// Build the functionalizer command line.
///
/// `{params.*}` and `{input.*}` tokens are filled in by the workflow engine.
pub fn command(invocation: &SpykfuncInvocation<'_>) -> Result<String> {
    let rule = invocation.rule;
    let mut parts: Vec<String> = vec![
        "dplace functionalizer".into(),
        invocation.extra_args.into(),
        "--work-dir {params.output_dir}/.fz".into(),
        "--output-dir {params.output_dir}".into(),
    ];
    match rule.pipeline() {
        None => parts.push("--merge".into()),
        Some(pipeline) => {
            let pop = invocation.population;
            parts.push(pipeline.render(rule.name(), invocation.filters, &invocation.conditions)?);
            parts.push("--output-order post".into());
            parts.push(format!("--from {{input.neurons}} {pop}"));
            parts.push(format!("--to {{input.neurons}} {pop}"));
            parts.push(format!("--recipe {}", invocation.recipe));
            parts.push(format!("--morphologies {}", invocation.morphologies));
        }
    }
    parts.push("-- {params.parquet_dirs}".into());
    Ok(parts.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    const WITH_SPINES: FilterConditions = FilterConditions {
        spine_morphologies: true,
    };

    #[test]
    fn test_rule_names_round_trip() {
        for rule in SpykfuncRule::ALL {
            assert_eq!(rule.name().parse::<SpykfuncRule>().unwrap(), rule);
        }
    }

    #[test]
    fn test_unknown_rule() {
        let err = "unknown".parse::<SpykfuncRule>().unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized rule 'unknown' in run_spykfunc");
    }

    #[test]
    fn test_required_adds_spine_stage_last() {
        assert_eq!(
            S2S_PIPELINE.required(&WITH_SPINES),
            vec!["BoutonDistance", "TouchRules", "SynapseProperties", "SpineMorphologies"]
        );
        assert_eq!(S2S_PIPELINE.required(&FilterConditions::default()).len(), 3);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(vec![]))]
    fn test_no_filters_uses_short_flag(#[case] filters: Option<Vec<String>>) {
        let rendered = S2F_PIPELINE
            .render("spykfunc_s2f", filters.as_deref(), &FilterConditions::default())
            .unwrap();
        assert_eq!(rendered, "--s2f");
    }

    #[test]
    fn test_no_filters_with_spines_spells_out_pipeline() {
        let rendered = S2S_PIPELINE.render("spykfunc_s2s", None, &WITH_SPINES).unwrap();
        assert_eq!(
            rendered,
            "--filters BoutonDistance,TouchRules,SynapseProperties,SpineMorphologies"
        );
    }

    #[test]
    fn test_user_order_and_extras_preserved() {
        let filters = strings(&["TouchRules", "AddID", "SynapseProperties", "BoutonDistance"]);
        let rendered = S2S_PIPELINE
            .render("spykfunc_s2s", Some(&filters), &FilterConditions::default())
            .unwrap();
        assert_eq!(
            rendered,
            "--filters TouchRules,AddID,SynapseProperties,BoutonDistance"
        );
    }

    #[test]
    fn test_missing_spine_stage_is_an_error() {
        let filters = strings(&["BoutonDistance", "TouchRules", "SynapseProperties"]);
        match S2S_PIPELINE.render("spykfunc_s2s", Some(&filters), &WITH_SPINES) {
            Err(Error::MissingFilters { missing, .. }) => {
                assert_eq!(missing, BTreeSet::from(["SpineMorphologies".to_string()]))
            }
            other => panic!("expected MissingFilters, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_filters_message() {
        let filters = strings(&["SpineLength"]);
        let err = S2S_PIPELINE
            .render("spykfunc_s2s", Some(&filters), &FilterConditions::default())
            .unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"spykfunc_s2s should have filters {'BoutonDistance', 'SynapseProperties', 'TouchRules'}"
        );
    }

    #[test]
    fn test_merge_command() {
        let invocation = SpykfuncInvocation {
            rule: SpykfuncRule::Merge,
            extra_args: "",
            filters: None,
            conditions: FilterConditions::default(),
            population: "ignored",
            recipe: "ignored",
            morphologies: "ignored",
        };
        assert_eq!(
            command(&invocation).unwrap(),
            "dplace functionalizer  --work-dir {params.output_dir}/.fz \
             --output-dir {params.output_dir} --merge -- {params.parquet_dirs}"
        );
    }
}
