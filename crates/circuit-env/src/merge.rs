//! Layered merge of environment descriptors
//!
//! Precedence when a patch is applied to a tool:
//!
//! - a patch whose `env_type` differs from the current descriptor, or a patch
//!   for a tool that does not exist yet, starts from an empty descriptor that
//!   only keeps the current `env_vars`;
//! - otherwise the patch is deep-merged into the current descriptor: scalars
//!   and sequences in the patch replace, mappings merge key by key;
//! - `env_vars` therefore overwrite same-named variables in place and append
//!   new ones.

use crate::{EnvType, EnvironmentDescriptor, Error, Result};
use serde_yaml::{Mapping, Value};

pub(crate) const ENV_TYPE_KEY: &str = "env_type";
pub(crate) const ENV_VARS_KEY: &str = "env_vars";

/// Deep merge two YAML values.
///
/// If both values are mappings, merge them recursively with `patch` taking
/// precedence. Otherwise `patch` replaces `base`.
pub fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Mapping(base_map), Value::Mapping(patch_map)) => {
            for (key, patch_val) in patch_map {
                match base_map.get_mut(key) {
                    Some(base_val) => deep_merge(base_val, patch_val),
                    None => {
                        base_map.insert(key.clone(), patch_val.clone());
                    }
                }
            }
        }
        (base, patch) => {
            *base = patch.clone();
        }
    }
}

pub(crate) fn parse_env_type(tool: &str, value: &Value) -> Result<EnvType> {
    value
        .as_str()
        .and_then(EnvType::parse)
        .ok_or_else(|| Error::UnknownEnvType {
            tool: tool.to_string(),
            env_type: render(value),
        })
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

fn incomplete(tool: &str, message: impl ToString) -> Error {
    Error::IncompleteDescriptor {
        tool: tool.to_string(),
        message: message.to_string(),
    }
}

/// Apply one override patch to the current descriptor of `tool`.
pub fn apply_patch(
    tool: &str,
    current: Option<&EnvironmentDescriptor>,
    patch: &Mapping,
) -> Result<EnvironmentDescriptor> {
    let patch_type = patch
        .get(ENV_TYPE_KEY)
        .map(|value| parse_env_type(tool, value))
        .transpose()?;

    let mut merged = match current {
        Some(current) if patch_type.is_none_or(|t| t == current.env_type()) => {
            serde_yaml::to_value(current).map_err(|e| incomplete(tool, e))?
        }
        Some(current) => {
            tracing::debug!(
                tool,
                from = %current.env_type(),
                to = ?patch_type,
                "Replacing environment with a different env_type"
            );
            let mut fresh = Mapping::new();
            if !current.env_vars.is_empty() {
                let vars =
                    serde_yaml::to_value(&current.env_vars).map_err(|e| incomplete(tool, e))?;
                fresh.insert(Value::from(ENV_VARS_KEY), vars);
            }
            Value::Mapping(fresh)
        }
        None => Value::Mapping(Mapping::new()),
    };

    deep_merge(&mut merged, &Value::Mapping(patch.clone()));

    match merged.get(ENV_TYPE_KEY) {
        Some(value) => {
            parse_env_type(tool, value)?;
        }
        None => return Err(incomplete(tool, "missing env_type")),
    }

    serde_yaml::from_value(merged).map_err(|e| incomplete(tool, e))
}
