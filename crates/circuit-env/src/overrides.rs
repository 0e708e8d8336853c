//! Override layers applied on top of the built-in registry

use crate::merge::{ENV_TYPE_KEY, parse_env_type};
use crate::{Error, Result};
use circuit_fs::DocumentStore;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;
use std::str::FromStr;

/// Keys accepted in an `environments.yaml` descriptor entry.
const DESCRIPTOR_KEYS: &[&str] = &[
    "env_type",
    "modules",
    "modulepath",
    "image",
    "options",
    "path",
    "env_vars",
];

/// Supported `environments.yaml` schema version.
pub const ENVIRONMENTS_VERSION: u64 = 1;

/// A module override given as `tool:module[,module...][:modulepath]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    pub tool: String,
    pub modules: Vec<String>,
    pub modulepath: Option<String>,
}

impl FromStr for ModuleSpec {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        let invalid = || Error::InvalidModuleSpec {
            spec: spec.to_string(),
        };
        let parts: Vec<&str> = spec.split(':').collect();
        let (tool, modules, modulepath) = match parts.as_slice() {
            [tool, modules] => (*tool, *modules, None),
            [tool, modules, modulepath] => (*tool, *modules, Some(*modulepath)),
            _ => return Err(invalid()),
        };
        if tool.is_empty() || modulepath.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        let modules: Vec<String> = modules.split(',').map(str::to_string).collect();
        if modules.iter().any(String::is_empty) {
            return Err(invalid());
        }
        Ok(Self {
            tool: tool.to_string(),
            modules,
            modulepath: modulepath.map(str::to_string),
        })
    }
}

impl ModuleSpec {
    /// The descriptor patch equivalent to this spec.
    pub fn to_patch(&self) -> Mapping {
        let mut patch = Mapping::new();
        patch.insert(Value::from(ENV_TYPE_KEY), Value::from("MODULE"));
        patch.insert(
            Value::from("modules"),
            Value::Sequence(self.modules.iter().map(|m| Value::from(m.as_str())).collect()),
        );
        if let Some(modulepath) = &self.modulepath {
            patch.insert(Value::from("modulepath"), Value::from(modulepath.as_str()));
        }
        patch
    }
}

/// The `environments.yaml` document of a bioname.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentsDocument {
    pub version: u64,
    #[serde(default)]
    pub env_config: Mapping,
}

impl EnvironmentsDocument {
    /// Load and version-check an environments document.
    pub fn load(path: &Path) -> Result<Self> {
        let document: Self = DocumentStore::new().load(path)?;
        if document.version != ENVIRONMENTS_VERSION {
            return Err(Error::UnsupportedVersion {
                path: path.to_path_buf(),
                version: document.version,
            });
        }
        Ok(document)
    }
}

/// One named set of per-tool descriptor patches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideLayer {
    name: String,
    patches: Vec<(String, Mapping)>,
}

impl OverrideLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            patches: Vec::new(),
        }
    }

    /// Add a patch for `tool` (builder pattern).
    pub fn with_patch(mut self, tool: impl Into<String>, patch: Mapping) -> Self {
        self.patches.push((tool.into(), patch));
        self
    }

    /// Build the layer from manifest `modules` entries.
    pub fn from_module_specs<S: AsRef<str>>(specs: &[S]) -> Result<Self> {
        let mut layer = Self::new("modules");
        for spec in specs {
            let spec: ModuleSpec = spec.as_ref().parse()?;
            let patch = spec.to_patch();
            layer = layer.with_patch(spec.tool, patch);
        }
        Ok(layer)
    }

    /// Build the layer from an `environments.yaml` document.
    pub fn from_document(document: &EnvironmentsDocument) -> Result<Self> {
        let mut layer = Self::new("environments.yaml");
        for (tool, entry) in &document.env_config {
            let tool = tool.as_str().ok_or_else(|| Error::InvalidOverride {
                tool: format!("{tool:?}"),
                message: "environment names must be strings".into(),
            })?;
            let patch = entry.as_mapping().ok_or_else(|| Error::InvalidOverride {
                tool: tool.to_string(),
                message: "expected a mapping".into(),
            })?;
            validate_patch(tool, patch)?;
            layer = layer.with_patch(tool, patch.clone());
        }
        Ok(layer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patches(&self) -> &[(String, Mapping)] {
        &self.patches
    }
}

fn validate_patch(tool: &str, patch: &Mapping) -> Result<()> {
    for key in patch.keys() {
        let known = key.as_str().is_some_and(|k| DESCRIPTOR_KEYS.contains(&k));
        if !known {
            return Err(Error::InvalidOverride {
                tool: tool.to_string(),
                message: format!("unknown key {key:?}"),
            });
        }
    }
    if let Some(value) = patch.get(ENV_TYPE_KEY) {
        parse_env_type(tool, value)?;
    }
    if let Some(vars) = patch.get("env_vars") {
        if !vars.is_mapping() {
            return Err(Error::InvalidOverride {
                tool: tool.to_string(),
                message: "env_vars must be a mapping".into(),
            });
        }
    }
    Ok(())
}
