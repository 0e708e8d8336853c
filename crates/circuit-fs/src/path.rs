//! Placeholder-aware path resolution
//!
//! Paths in a circuit manifest are either relative to some directory (the
//! bioname or the circuit directory), absolute, or `$`-prefixed placeholders
//! that a later templating stage expands. Resolution follows symlinks of the
//! parts that exist and collapses the rest lexically, so it also works for
//! outputs that do not exist yet.

use std::path::{Component, Path, PathBuf};

/// Placeholder used by SONATA network configs for the circuit directory.
pub const BASE_DIR: &str = "$BASE_DIR";

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// `..` at the root of an absolute path is dropped; leading `..` of a relative
/// path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `path` against the absolute form of `parent_dir`.
///
/// An absolute `path` ignores `parent_dir`. A relative `parent_dir` is taken
/// relative to the working directory at call time. Components that exist are
/// canonicalized, so symlinks are followed before a later `..` applies;
/// missing components are kept as written, which lets outputs that do not
/// exist yet resolve too.
pub fn abs_path(parent_dir: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let parent_dir = parent_dir.as_ref();
    let parent_dir = if parent_dir.as_os_str().is_empty() {
        Path::new(".")
    } else {
        parent_dir
    };
    let parent = std::path::absolute(parent_dir).unwrap_or_else(|_| parent_dir.to_path_buf());
    resolve(&parent.join(path.as_ref()))
}

/// Walk an absolute path component by component, canonicalizing each prefix
/// that exists on disk.
fn resolve(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = resolved.components().next_back() {
                    resolved.pop();
                }
            }
            Component::Normal(name) => {
                resolved.push(name);
                if let Ok(real) = dunce::canonicalize(&resolved) {
                    resolved = real;
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Resolve a manifest path string to an absolute path string.
///
/// `$`-prefixed values are returned verbatim.
pub fn make_abs(parent_dir: impl AsRef<Path>, path: &str) -> String {
    if path.starts_with('$') {
        return path.to_string();
    }
    abs_path(parent_dir, path).to_string_lossy().into_owned()
}

/// Render `path` for a network config whose `$BASE_DIR` is `circuit_dir`.
///
/// Paths inside the circuit directory become `$BASE_DIR/<relative>`, anything
/// else is written as an absolute path. Placeholders pass through.
pub fn to_base_dir(circuit_dir: &Path, path: &Path) -> String {
    let as_str = path.to_string_lossy();
    if as_str.starts_with('$') {
        return as_str.into_owned();
    }
    let circuit_dir = abs_path(".", circuit_dir);
    let resolved = abs_path(&circuit_dir, path);
    match resolved.strip_prefix(&circuit_dir) {
        Ok(relative) if relative.as_os_str().is_empty() => BASE_DIR.to_string(),
        Ok(relative) => {
            let parts: Vec<_> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            format!("{}/{}", BASE_DIR, parts.join("/"))
        }
        Err(_) => resolved.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn normalize_stops_at_root() {
        assert_eq!(normalize(Path::new("/../../a")), PathBuf::from("/a"));
    }

    #[test]
    fn normalize_keeps_leading_parent_of_relative_path() {
        assert_eq!(normalize(Path::new("../../a/b/..")), PathBuf::from("../../a"));
    }

    #[test]
    fn to_base_dir_inside_circuit() {
        let rendered = to_base_dir(Path::new("/work/circuit"), Path::new("sonata/node_sets.json"));
        assert_eq!(rendered, "$BASE_DIR/sonata/node_sets.json");
    }

    #[test]
    fn to_base_dir_outside_circuit_is_absolute() {
        let rendered = to_base_dir(Path::new("/work/circuit"), Path::new("/data/atlas/v.h5"));
        assert_eq!(rendered, "/data/atlas/v.h5");
    }

    #[test]
    fn to_base_dir_of_sibling_prefix_is_not_inside() {
        let rendered = to_base_dir(Path::new("/work/circuit"), Path::new("/work/circuit2/x"));
        assert_eq!(rendered, "/work/circuit2/x");
    }
}
