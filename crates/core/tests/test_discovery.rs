//! Tests for source file enumeration

use ripple_core::discover_files;
use std::path::PathBuf;
use tempfile::TempDir;

const EXTS: &[&str] = &[".ts", ".tsx", ".js", ".jsx"];

fn write(dir: &TempDir, name: &str, content: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

#[test]
fn test_discover_files_basic() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "main.ts", "export function main() {}");
    write(&tmp, "lib.js", "function lib() {}");
    write(&tmp, "readme.md", "# hi");
    write(&tmp, "styles.css", "a {}");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(files, vec![PathBuf::from("lib.js"), PathBuf::from("main.ts")]);
}

#[test]
fn test_paths_are_relative_and_sorted() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "src/z.ts", "x");
    write(&tmp, "src/a/b.tsx", "x");
    write(&tmp, "app.jsx", "x");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert!(files.iter().all(|f| f.is_relative()));
    assert_eq!(
        files,
        vec![
            PathBuf::from("app.jsx"),
            PathBuf::from("src/a/b.tsx"),
            PathBuf::from("src/z.ts"),
        ]
    );

    // Deterministic across runs
    let again = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(files, again);
}

#[test]
fn test_custom_ignore_patterns() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, "node_modules/react/index.js", "x");
    write(&tmp, "src/index.ts", "x");

    let files = discover_files(tmp.path(), EXTS, &["node_modules/".to_string()]).unwrap();
    assert_eq!(files, vec![PathBuf::from("src/index.ts")]);
}

#[test]
fn test_gitignore_respected_without_repository() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".gitignore", "generated/\n");
    write(&tmp, "generated/api.ts", "x");
    write(&tmp, "app.ts", "x");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(files, vec![PathBuf::from("app.ts")]);
}

#[test]
fn test_nested_ignore_file_closest_rule_wins() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join(".git")).unwrap();
    write(&tmp, ".gitignore", "*.gen.ts\n");
    write(&tmp, "root.gen.ts", "x");
    write(&tmp, "pkg/.gitignore", "!keep.gen.ts\n");
    write(&tmp, "pkg/keep.gen.ts", "x");
    write(&tmp, "pkg/drop.gen.ts", "x");
    write(&tmp, "pkg/main.ts", "x");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(
        files,
        vec![PathBuf::from("pkg/keep.gen.ts"), PathBuf::from("pkg/main.ts")]
    );
}

#[test]
fn test_vcs_metadata_always_excluded() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".git/hooks/pre-commit.js", "x");
    write(&tmp, ".hg/store.js", "x");
    write(&tmp, "index.js", "x");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(files, vec![PathBuf::from("index.js")]);
}

#[test]
fn test_dot_directories_are_scanned() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".storybook/main.ts", "x");

    let files = discover_files(tmp.path(), EXTS, &[]).unwrap();
    assert_eq!(files, vec![PathBuf::from(".storybook/main.ts")]);
}

#[test]
fn test_missing_root_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("does-not-exist");
    assert!(discover_files(&missing, EXTS, &[]).is_err());
}

#[test]
fn test_ignore_files_above_root_do_not_apply() {
    let tmp = TempDir::new().unwrap();
    write(&tmp, ".gitignore", "*.ts\n");
    write(&tmp, ".ignore", "proj/lib.js\n");
    write(&tmp, "proj/api.ts", "export function fetchApi() {}");
    write(&tmp, "proj/lib.js", "function lib() {}");

    let files = discover_files(&tmp.path().join("proj"), EXTS, &[]).unwrap();
    assert_eq!(files, vec![PathBuf::from("api.ts"), PathBuf::from("lib.js")]);
}

#[cfg(unix)]
#[test]
fn test_unreadable_directory_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write(&tmp, "a.ts", "x");
    write(&tmp, "locked/hidden.ts", "x");
    write(&tmp, "z/b.ts", "x");

    let locked = tmp.path().join("locked");
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through the permission bits; nothing to check then
    if std::fs::read_dir(&locked).is_ok() {
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let files = discover_files(tmp.path(), EXTS, &[]);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(
        files.unwrap(),
        vec![PathBuf::from("a.ts"), PathBuf::from("z/b.ts")]
    );
}
