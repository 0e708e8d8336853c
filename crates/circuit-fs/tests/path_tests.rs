use circuit_fs::{abs_path, make_abs, to_base_dir};
use rstest::rstest;
use std::path::{Path, PathBuf};

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap()
}

#[rstest]
#[case("/a/b", "c", "/a/b/c")]
#[case("/a/b", "/c", "/c")]
#[case("a", "/c/d", "/c/d")]
#[case("/a/b", "../c", "/a/c")]
#[case("/a/b", "./c/./d", "/a/b/c/d")]
fn test_make_abs_with_absolute_results(
    #[case] parent_dir: &str,
    #[case] path: &str,
    #[case] expected: &str,
) {
    assert_eq!(make_abs(parent_dir, path), expected);
}

#[rstest]
#[case(".", "$A")]
#[case("/a/b", "$BASE_DIR/sonata")]
#[case("relative", "${placeholder}/x")]
fn test_make_abs_passes_placeholders_through(#[case] parent_dir: &str, #[case] path: &str) {
    assert_eq!(make_abs(parent_dir, path), path);
}

#[test]
fn test_make_abs_relative_to_cwd() {
    let expected = cwd().join("c");
    assert_eq!(make_abs(".", "c"), expected.to_string_lossy());
}

#[test]
fn test_make_abs_relative_to_cwd_parent() {
    let expected = cwd().parent().unwrap().join("c");
    assert_eq!(make_abs("..", "c"), expected.to_string_lossy());
}

#[test]
fn test_make_abs_relative_parent_dir() {
    let expected = cwd().join("a").join("c");
    assert_eq!(make_abs("a", "c"), expected.to_string_lossy());
}

#[test]
fn test_make_abs_is_idempotent_on_its_output() {
    let once = make_abs("/a/b", "c/../d");
    assert_eq!(make_abs("/a/b", &once), once);
}

#[test]
fn test_abs_path_empty_parent_is_cwd() {
    assert_eq!(abs_path("", "x"), cwd().join("x"));
}

#[test]
fn test_to_base_dir_for_circuit_root() {
    assert_eq!(to_base_dir(Path::new("/c"), Path::new("/c")), "$BASE_DIR");
}

#[test]
fn test_to_base_dir_keeps_placeholders() {
    assert_eq!(
        to_base_dir(Path::new("/c"), Path::new("$BASE_DIR/hoc_files")),
        "$BASE_DIR/hoc_files"
    );
}

#[cfg(unix)]
mod symlinks {
    use super::*;
    use std::fs;
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    /// `<root>/link -> <root>/real/inner`
    fn linked_tree() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = dunce::canonicalize(temp.path()).unwrap();
        fs::create_dir_all(root.join("real/inner")).unwrap();
        symlink(root.join("real/inner"), root.join("link")).unwrap();
        (temp, root)
    }

    #[test]
    fn test_make_abs_follows_symlinked_parent_before_parent_dir() {
        let (_temp, root) = linked_tree();
        assert_eq!(
            make_abs(root.join("link"), "../c"),
            root.join("real/c").to_string_lossy()
        );
    }

    #[test]
    fn test_make_abs_resolves_the_symlink_itself() {
        let (_temp, root) = linked_tree();
        let link = root.join("link");
        assert_eq!(
            make_abs(".", &link.to_string_lossy()),
            root.join("real/inner").to_string_lossy()
        );
    }

    #[test]
    fn test_missing_tail_below_symlink_is_collapsed() {
        let (_temp, root) = linked_tree();
        assert_eq!(
            abs_path(root.join("link"), "out/./new/../config.json"),
            root.join("real/inner/out/config.json")
        );
    }

    #[test]
    fn test_relative_symlink_target() {
        let (_temp, root) = linked_tree();
        symlink("real/inner", root.join("relative")).unwrap();
        assert_eq!(abs_path(&root, "relative/../x"), root.join("real/x"));
    }

    #[test]
    fn test_to_base_dir_through_symlinked_circuit_dir() {
        let (_temp, root) = linked_tree();
        let link = root.join("link");
        assert_eq!(
            to_base_dir(&link, &root.join("real/inner/sonata/node_sets.json")),
            "$BASE_DIR/sonata/node_sets.json"
        );
        assert_eq!(
            to_base_dir(&root.join("real/inner"), &link.join("hoc_files")),
            "$BASE_DIR/hoc_files"
        );
    }
}
