//! Resolved environment registry

use crate::merge::apply_patch;
use crate::{EnvironmentDescriptor, OverrideLayer, Result};
use std::collections::BTreeMap;

/// Tool name to environment descriptor, one entry per tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvRegistry {
    tools: BTreeMap<String, EnvironmentDescriptor>,
}

impl EnvRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with all built-in environments.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, descriptor) in super::builtins::builtin_environments() {
            registry.register(name, descriptor);
        }
        registry
    }

    /// Resolve the built-ins with `layers` applied in order.
    pub fn resolve(layers: &[OverrideLayer]) -> Result<Self> {
        let mut registry = Self::with_builtins();
        for layer in layers {
            registry.apply(layer)?;
        }
        Ok(registry)
    }

    /// Apply one override layer.
    pub fn apply(&mut self, layer: &OverrideLayer) -> Result<()> {
        tracing::debug!(
            layer = layer.name(),
            patches = layer.patches().len(),
            "Applying environment layer"
        );
        for (tool, patch) in layer.patches() {
            let descriptor = apply_patch(tool, self.tools.get(tool), patch)?;
            self.tools.insert(tool.clone(), descriptor);
        }
        Ok(())
    }

    /// Register (or replace) a descriptor.
    pub fn register(&mut self, name: impl Into<String>, descriptor: EnvironmentDescriptor) {
        self.tools.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&EnvironmentDescriptor> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// List all tool names (sorted).
    pub fn list(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvironmentDescriptor)> {
        self.tools.iter().map(|(k, v)| (k.as_str(), v))
    }
}
