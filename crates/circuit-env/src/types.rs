//! Environment descriptor types

use crate::registry::{
    APPTAINER_MODULEPATH, APPTAINER_MODULES, APPTAINER_OPTIONS, SPACK_MODULEPATH,
};
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// How a tool environment is activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvType {
    /// Environment modules (`module load ...`)
    Module,
    /// Apptainer/Singularity container image
    Apptainer,
    /// Python virtual environment
    Venv,
}

impl EnvType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Module => "MODULE",
            Self::Apptainer => "APPTAINER",
            Self::Venv => "VENV",
        }
    }

    /// Parse the manifest spelling (`MODULE`, `APPTAINER`, `VENV`).
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MODULE" => Some(Self::Module),
            "APPTAINER" => Some(Self::Apptainer),
            "VENV" => Some(Self::Venv),
            _ => None,
        }
    }
}

impl std::fmt::Display for EnvType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_modulepath() -> String {
    SPACK_MODULEPATH.to_string()
}

fn default_apptainer_options() -> String {
    APPTAINER_OPTIONS.to_string()
}

fn default_apptainer_modulepath() -> String {
    APPTAINER_MODULEPATH.to_string()
}

fn default_apptainer_modules() -> Vec<String> {
    APPTAINER_MODULES.iter().map(|m| m.to_string()).collect()
}

/// The activation-specific part of an environment descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "env_type")]
pub enum EnvKind {
    #[serde(rename = "MODULE")]
    Module {
        #[serde(default = "default_modulepath")]
        modulepath: String,
        modules: Vec<String>,
    },
    #[serde(rename = "APPTAINER")]
    Apptainer {
        image: String,
        #[serde(default = "default_apptainer_options")]
        options: String,
        /// Module path providing the container runtime
        #[serde(default = "default_apptainer_modulepath")]
        modulepath: String,
        /// Modules providing the container runtime
        #[serde(default = "default_apptainer_modules")]
        modules: Vec<String>,
    },
    #[serde(rename = "VENV")]
    Venv { path: String },
}

/// Environment variables exported before running a tool.
///
/// Keeps insertion order. Inserting an existing name replaces the value in
/// place; new names are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Mapping", into = "Mapping")]
pub struct EnvVars(Vec<(String, String)>);

impl EnvVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Overlay `other` on top of `self` (last write wins).
    pub fn merge(&mut self, other: &EnvVars) {
        for (name, value) in other.iter() {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (k, v) in iter {
            vars.insert(k, v);
        }
        vars
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl TryFrom<Mapping> for EnvVars {
    type Error = String;

    fn try_from(mapping: Mapping) -> std::result::Result<Self, Self::Error> {
        let mut vars = Self::new();
        for (key, value) in &mapping {
            let name = key
                .as_str()
                .ok_or_else(|| format!("env_vars key {key:?} is not a string"))?;
            let value = scalar_to_string(value)
                .ok_or_else(|| format!("env_vars value for '{name}' is not a scalar"))?;
            vars.insert(name, value);
        }
        Ok(vars)
    }
}

impl From<EnvVars> for Mapping {
    fn from(vars: EnvVars) -> Self {
        vars.0
            .into_iter()
            .map(|(k, v)| (Value::String(k), Value::String(v)))
            .collect()
    }
}

/// A resolved tool environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDescriptor {
    #[serde(flatten)]
    pub kind: EnvKind,
    #[serde(default, skip_serializing_if = "EnvVars::is_empty")]
    pub env_vars: EnvVars,
}

impl EnvironmentDescriptor {
    pub fn module<S: Into<String>>(
        modulepath: impl Into<String>,
        modules: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            kind: EnvKind::Module {
                modulepath: modulepath.into(),
                modules: modules.into_iter().map(Into::into).collect(),
            },
            env_vars: EnvVars::new(),
        }
    }

    /// Container environment using the site defaults for the runtime.
    pub fn apptainer(image: impl Into<String>) -> Self {
        Self {
            kind: EnvKind::Apptainer {
                image: image.into(),
                options: default_apptainer_options(),
                modulepath: default_apptainer_modulepath(),
                modules: default_apptainer_modules(),
            },
            env_vars: EnvVars::new(),
        }
    }

    pub fn venv(path: impl Into<String>) -> Self {
        Self {
            kind: EnvKind::Venv { path: path.into() },
            env_vars: EnvVars::new(),
        }
    }

    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(name, value);
        self
    }

    pub fn env_type(&self) -> EnvType {
        match self.kind {
            EnvKind::Module { .. } => EnvType::Module,
            EnvKind::Apptainer { .. } => EnvType::Apptainer,
            EnvKind::Venv { .. } => EnvType::Venv,
        }
    }

    /// Modules to load, if the environment uses any.
    pub fn modules(&self) -> &[String] {
        match &self.kind {
            EnvKind::Module { modules, .. } | EnvKind::Apptainer { modules, .. } => modules,
            EnvKind::Venv { .. } => &[],
        }
    }

    pub fn modulepath(&self) -> Option<&str> {
        match &self.kind {
            EnvKind::Module { modulepath, .. } | EnvKind::Apptainer { modulepath, .. } => {
                Some(modulepath)
            }
            EnvKind::Venv { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_insert_keeps_position() {
        let mut vars: EnvVars = [("A", "1"), ("B", "2")].into_iter().collect();
        vars.insert("A", "3");
        vars.insert("C", "4");
        assert_eq!(vars.names(), vec!["A", "B", "C"]);
        assert_eq!(vars.get("A"), Some("3"));
    }

    #[test]
    fn descriptor_serializes_tag_first() {
        let descriptor = EnvironmentDescriptor::venv("/opt/venv").with_env_var("X", "1");
        let yaml = serde_yaml::to_string(&descriptor).unwrap();
        assert_eq!(yaml, "env_type: VENV\npath: /opt/venv\nenv_vars:\n  X: '1'\n");
    }

    #[test]
    fn apptainer_fields_default_from_site_settings() {
        let descriptor: EnvironmentDescriptor =
            serde_yaml::from_str("env_type: APPTAINER\nimage: /images/tool.sif\n").unwrap();
        assert_eq!(descriptor, EnvironmentDescriptor::apptainer("/images/tool.sif"));
        assert_eq!(descriptor.modulepath(), Some(APPTAINER_MODULEPATH));
    }

    #[test]
    fn env_vars_accept_scalar_values() {
        let descriptor: EnvironmentDescriptor = serde_yaml::from_str(
            "env_type: VENV\npath: /v\nenv_vars:\n  THREADS: 4\n  DEBUG: true\n",
        )
        .unwrap();
        assert_eq!(descriptor.env_vars.get("THREADS"), Some("4"));
        assert_eq!(descriptor.env_vars.get("DEBUG"), Some("true"));
    }

    #[test]
    fn env_type_parse_is_exact() {
        assert_eq!(EnvType::parse("MODULE"), Some(EnvType::Module));
        assert_eq!(EnvType::parse("module"), None);
    }
}
