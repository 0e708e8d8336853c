//! Git repository fixtures.
//!
//! Everything goes through `git2`, so tests do not depend on a `git` binary
//! or on the user's global git configuration.

use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};

/// Initialises an empty repository at `path` with a test identity configured.
///
/// # Panics
/// Panics if `git2` fails to initialise or configure the repository.
pub fn init_repo(path: &Path) -> Repository {
    let repo = Repository::init(path).unwrap_or_else(|e| {
        panic!("init_repo: failed to init repository at {}: {e}", path.display())
    });
    {
        let mut config = repo
            .config()
            .unwrap_or_else(|e| panic!("init_repo: failed to open config: {e}"));
        for (key, value) in [("user.name", "Test User"), ("user.email", "test@test.com")] {
            config
                .set_str(key, value)
                .unwrap_or_else(|e| panic!("init_repo: failed to set {key}: {e}"));
        }
    }
    repo
}

/// Stages every file in the work tree and commits it on top of HEAD.
///
/// # Panics
/// Panics if any git operation fails.
pub fn commit_all(repo: &Repository, message: &str) -> Oid {
    let mut index = repo
        .index()
        .unwrap_or_else(|e| panic!("commit_all: failed to open index: {e}"));
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap_or_else(|e| panic!("commit_all: failed to stage files: {e}"));
    index
        .write()
        .unwrap_or_else(|e| panic!("commit_all: failed to write index: {e}"));
    let tree_id = index
        .write_tree()
        .unwrap_or_else(|e| panic!("commit_all: failed to write tree: {e}"));
    let tree = repo
        .find_tree(tree_id)
        .unwrap_or_else(|e| panic!("commit_all: failed to find tree: {e}"));
    let signature = Signature::now("Test User", "test@test.com")
        .unwrap_or_else(|e| panic!("commit_all: failed to build signature: {e}"));

    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .unwrap_or_else(|e| panic!("commit_all: failed to commit: {e}"))
}

/// Initialises a repository at `path` and commits whatever it already contains.
///
/// # Panics
/// Panics if any git operation fails.
pub fn init_repo_with_commit(path: &Path) -> Repository {
    let repo = init_repo(path);
    commit_all(&repo, "Initial commit");
    repo
}
