//! [`TestBioname`] builder for circuit-build test scenarios.
//!
//! A fixture is a temporary directory holding:
//!
//! ```text
//! <root>/bioname/      MANIFEST.yaml, recipe, morphdb, entities/...
//! <root>/circuit/      build output directory (empty)
//! <root>/data/atlas/   external atlas (standalone NGV only)
//! ```
//!
//! The manifest sets `circuit_dir` to the absolute circuit directory so tests
//! never need to change the process working directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};
use tempfile::TempDir;

/// Which kind of circuit the fixture describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Released morphologies and emodels
    Release,
    /// Synthesized morphologies
    Synthesis,
    /// Neuro-glia-vasculature on top of a neuronal circuit
    NgvFull,
    /// Neuro-glia-vasculature with an externally provided atlas
    NgvStandalone,
}

/// Builder for [`TestBioname`].
#[derive(Debug, Clone)]
pub struct TestBionameBuilder {
    layout: Layout,
    common: Vec<(String, Value)>,
    sections: Vec<(String, Value)>,
    emodel_files: bool,
    git: bool,
}

impl TestBionameBuilder {
    /// Set (or replace) a key in the `common` section.
    pub fn common(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.common.push((key.to_string(), value.into()));
        self
    }

    /// Set a top-level manifest section from YAML text.
    ///
    /// # Panics
    /// Panics if `yaml` does not parse.
    pub fn section(mut self, name: &str, yaml: &str) -> Self {
        let value: Value = serde_yaml::from_str(yaml).unwrap_or_else(|e| {
            panic!("TestBionameBuilder::section: invalid YAML for {name}: {e}")
        });
        self.sections.push((name.to_string(), value));
        self
    }

    /// Skip creating `mecombo_emodel.tsv` and `hoc/` in the emodel release.
    pub fn without_emodel_files(mut self) -> Self {
        self.emodel_files = false;
        self
    }

    /// Put the bioname under git and commit it.
    pub fn with_git(mut self) -> Self {
        self.git = true;
        self
    }

    /// Create the directories and files.
    ///
    /// # Panics
    /// Panics if any filesystem or git operation fails.
    pub fn build(self) -> TestBioname {
        let temp = TempDir::new().unwrap_or_else(|e| panic!("TestBioname: tempdir failed: {e}"));
        // Canonical, so expected paths match resolved ones
        let root = dunce::canonicalize(temp.path())
            .unwrap_or_else(|e| panic!("TestBioname: cannot resolve tempdir: {e}"));
        let bioname = root.join("bioname");
        let circuit_dir = root.join("circuit");
        mkdir(&bioname);
        mkdir(&circuit_dir);

        touch(&bioname.join("builderRecipeAllPathways.xml"));
        touch(&bioname.join("extNeuronDB.dat"));
        touch(&bioname.join("neurondb-axon.dat"));

        let mut common = Mapping::new();
        let mut manifest = Mapping::new();

        match self.layout {
            Layout::Release => {
                mkdir(&bioname.join("entities/atlas"));
                mkdir(&bioname.join("entities/morphologies/h5v1"));
                mkdir(&bioname.join("entities/morphologies/ascii"));
                mkdir(&bioname.join("entities/emodels"));
                if self.emodel_files {
                    touch(&bioname.join("entities/emodels/mecombo_emodel.tsv"));
                    mkdir(&bioname.join("entities/emodels/hoc"));
                }
                insert(&mut common, "atlas", "entities/atlas");
                insert(&mut common, "morph_release", "entities/morphologies");
                insert(&mut common, "emodel_release", "entities/emodels");
                insert(&mut common, "synthesis", false);
            }
            Layout::Synthesis | Layout::NgvFull => {
                mkdir(&bioname.join("entities/atlas"));
                mkdir(&bioname.join("entities/emodels"));
                insert(&mut common, "atlas", "entities/atlas");
                insert(&mut common, "synthesis", true);
                insert(&mut common, "synthesize_emodel_release", "entities/emodels");
                if self.layout == Layout::NgvFull {
                    insert(&mut manifest, "ngv", yaml("common: {}"));
                }
            }
            Layout::NgvStandalone => {
                mkdir(&root.join("data/atlas"));
                insert(&mut common, "node_population_name", "All");
                insert(&mut common, "edge_population_name", "All");
                insert(&mut manifest, "ngv", yaml("common:\n  atlas: ../data/atlas\n"));
            }
        }
        insert(&mut common, "partition", Value::Sequence(Vec::new()));
        for (key, value) in self.common {
            insert(&mut common, &key, value);
        }

        insert(&mut manifest, "circuit_dir", circuit_dir.to_string_lossy().into_owned());
        insert(&mut manifest, "common", Value::Mapping(common));
        for (name, value) in self.sections {
            insert(&mut manifest, &name, value);
        }

        let fixture = TestBioname {
            _temp: temp,
            root,
            bioname,
            circuit_dir,
        };
        fixture.write_manifest(&manifest);

        if self.git {
            crate::git::init_repo_with_commit(&fixture.bioname);
        }
        fixture
    }
}

/// A temporary bioname plus circuit directory.
///
/// # Example
///
/// ```rust,no_run
/// use circuit_test_utils::TestBioname;
///
/// let fixture = TestBioname::release();
/// fixture.edit_manifest(|manifest| {
///     manifest.insert("modules".into(), serde_yaml::from_str("[]").unwrap());
/// });
/// ```
pub struct TestBioname {
    /// Removed on drop.
    _temp: TempDir,
    root: PathBuf,
    bioname: PathBuf,
    circuit_dir: PathBuf,
}

impl TestBioname {
    pub fn builder(layout: Layout) -> TestBionameBuilder {
        TestBionameBuilder {
            layout,
            common: Vec::new(),
            sections: Vec::new(),
            emodel_files: true,
            git: false,
        }
    }

    pub fn release() -> Self {
        Self::builder(Layout::Release).build()
    }

    pub fn synthesis() -> Self {
        Self::builder(Layout::Synthesis).build()
    }

    pub fn ngv_full() -> Self {
        Self::builder(Layout::NgvFull).build()
    }

    pub fn ngv_standalone() -> Self {
        Self::builder(Layout::NgvStandalone).build()
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bioname(&self) -> &Path {
        &self.bioname
    }

    pub fn circuit_dir(&self) -> &Path {
        &self.circuit_dir
    }

    /// External data directory used by the standalone NGV layout.
    pub fn data_dir(&self) -> PathBuf {
        self.root().join("data")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.bioname.join("MANIFEST.yaml")
    }

    /// Load the manifest, let `edit` change it, and write it back.
    ///
    /// # Panics
    /// Panics if the manifest cannot be read or written.
    pub fn edit_manifest(&self, edit: impl FnOnce(&mut Mapping)) {
        let path = self.manifest_path();
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("edit_manifest: cannot read {}: {e}", path.display()));
        let mut manifest: Mapping = serde_yaml::from_str(&content)
            .unwrap_or_else(|e| panic!("edit_manifest: invalid manifest: {e}"));
        edit(&mut manifest);
        self.write_manifest(&manifest);
    }

    /// Write `<bioname>/environments.yaml`.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn write_environments(&self, content: &str) {
        let path = self.bioname.join("environments.yaml");
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("write_environments: cannot write {}: {e}", path.display()));
    }

    fn write_manifest(&self, manifest: &Mapping) {
        let content = serde_yaml::to_string(manifest)
            .unwrap_or_else(|e| panic!("TestBioname: cannot serialize manifest: {e}"));
        let path = self.manifest_path();
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestBioname: cannot write {}: {e}", path.display()));
    }
}

fn insert(mapping: &mut Mapping, key: &str, value: impl Into<Value>) {
    mapping.insert(Value::from(key), value.into());
}

fn yaml(text: &str) -> Value {
    serde_yaml::from_str(text).unwrap_or_else(|e| panic!("TestBioname: invalid YAML: {e}"))
}

fn mkdir(path: &Path) {
    fs::create_dir_all(path)
        .unwrap_or_else(|e| panic!("TestBioname: cannot create {}: {e}", path.display()));
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        mkdir(parent);
    }
    fs::write(path, "")
        .unwrap_or_else(|e| panic!("TestBioname: cannot create {}: {e}", path.display()));
}
