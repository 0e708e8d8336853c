//! Build manifest access
//!
//! [`Config`] wraps the YAML tree of a bioname's `MANIFEST.yaml`. Lookups take
//! a key path, either a single key or a sequence of keys, and never fail on
//! missing data: any absent step, or a step through a non-mapping, yields the
//! default.

mod key_path;
mod validate;

pub use key_path::KeyPath;
pub use validate::validate_manifest;

use crate::{Error, Result};
use circuit_fs::{CircuitPath, DocumentStore};
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Manifest key holding the bioname directory.
pub const BIONAME_KEY: &str = "bioname";

/// Immutable view of a build manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    data: Mapping,
}

impl From<Mapping> for Config {
    fn from(data: Mapping) -> Self {
        Self { data }
    }
}

impl Config {
    pub fn new(data: Mapping) -> Self {
        Self { data }
    }

    /// Parse a manifest from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(text)?;
        match value {
            Value::Mapping(data) => Ok(Self { data }),
            Value::Null => Ok(Self::default()),
            _ => Err(Error::invalid_manifest("<root>", "expected a mapping")),
        }
    }

    /// Load `<bioname_dir>/MANIFEST.yaml` and record `bioname_dir` in it.
    pub fn load_manifest(bioname_dir: &Path) -> Result<Self> {
        let path = bioname_dir.join(CircuitPath::Manifest);
        let data: Mapping = DocumentStore::new().load(&path)?;
        tracing::debug!(path = %path.display(), "Loaded manifest");
        Ok(Self { data }.with_value(BIONAME_KEY, bioname_dir.to_string_lossy().into_owned()))
    }

    /// A copy with the top-level `key` set to `value`.
    pub fn with_value(&self, key: &str, value: impl Into<Value>) -> Self {
        let mut data = self.data.clone();
        data.insert(Value::from(key), value.into());
        Self { data }
    }

    /// A copy where each section of `overrides` updates the same section here.
    ///
    /// Mapping sections are updated key by key (one level deep); any other
    /// value replaces the section.
    pub fn with_overrides(&self, overrides: &Mapping) -> Self {
        let mut data = self.data.clone();
        for (section, patch) in overrides {
            match (data.get_mut(section), patch) {
                (Some(Value::Mapping(current)), Value::Mapping(patch)) => {
                    for (key, value) in patch {
                        current.insert(key.clone(), value.clone());
                    }
                }
                _ => {
                    data.insert(section.clone(), patch.clone());
                }
            }
        }
        Self { data }
    }

    /// Value at `keys`, if every step exists.
    pub fn get<K: KeyPath + ?Sized>(&self, keys: &K) -> Option<&Value> {
        let mut segments = keys.segments().into_iter();
        let first = segments.next()?;
        let mut current = self.data.get(first)?;
        for key in segments {
            current = current.as_mapping()?.get(key)?;
        }
        Some(current)
    }

    pub fn get_or<'a, K: KeyPath + ?Sized>(&'a self, keys: &K, default: &'a Value) -> &'a Value {
        self.get(keys).unwrap_or(default)
    }

    pub fn contains<K: KeyPath + ?Sized>(&self, keys: &K) -> bool {
        self.get(keys).is_some()
    }

    /// String at `keys`; `None` when absent, null or not a string.
    pub fn get_str<K: KeyPath + ?Sized>(&self, keys: &K) -> Option<&str> {
        self.get(keys).and_then(Value::as_str)
    }

    /// Non-empty string at `keys`.
    pub fn get_non_empty_str<K: KeyPath + ?Sized>(&self, keys: &K) -> Option<&str> {
        self.get_str(keys).filter(|s| !s.is_empty())
    }

    pub fn get_bool<K: KeyPath + ?Sized>(&self, keys: &K) -> Option<bool> {
        self.get(keys).and_then(Value::as_bool)
    }

    /// Sequence of strings at `keys`.
    ///
    /// Returns `None` when absent or null; non-string items are an error.
    pub fn get_str_list<K: KeyPath + ?Sized>(&self, keys: &K) -> Result<Option<Vec<String>>> {
        let value = match self.get(keys) {
            None | Some(Value::Null) => return Ok(None),
            Some(value) => value,
        };
        let invalid = || Error::invalid_manifest(keys.dotted(), "expected a list of strings");
        let items = value.as_sequence().ok_or_else(invalid)?;
        items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn get_mapping<K: KeyPath + ?Sized>(&self, keys: &K) -> Option<&Mapping> {
        self.get(keys).and_then(Value::as_mapping)
    }

    pub fn as_mapping(&self) -> &Mapping {
        &self.data
    }
}
