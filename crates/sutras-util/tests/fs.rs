use sutras_util::fs::{ensure_dir, find_ancestor_with, write_atomic};
use tempfile::TempDir;

#[test]
fn manifest_found_in_start_directory() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("skill.toml"), "").unwrap();
    assert_eq!(
        find_ancestor_with(tmp.path(), "skill.toml"),
        Some(tmp.path().to_path_buf())
    );
}

#[test]
fn nearest_manifest_wins() {
    let tmp = TempDir::new().unwrap();
    let inner = tmp.path().join("skills").join("summarize");
    let nested = inner.join("prompts");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(tmp.path().join("skill.toml"), "").unwrap();
    std::fs::write(inner.join("skill.toml"), "").unwrap();

    assert_eq!(find_ancestor_with(&nested, "skill.toml"), Some(inner));
}

#[test]
fn no_manifest_anywhere() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(find_ancestor_with(tmp.path(), "no-such-marker.toml"), None);
}

#[test]
fn ensure_dir_is_idempotent() {
    let tmp = TempDir::new().unwrap();
    let deep = tmp.path().join("registry-cache").join("acme_text").join("1.0.0");
    ensure_dir(&deep).unwrap();
    ensure_dir(&deep).unwrap();
    assert!(deep.is_dir());
}

#[test]
fn write_atomic_creates_parents_and_replaces() {
    let tmp = TempDir::new().unwrap();
    let target = tmp.path().join("nested").join("sutras.lock");
    write_atomic(&target, b"first").unwrap();
    write_atomic(&target, b"second").unwrap();
    assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");

    let leftovers: Vec<_> = std::fs::read_dir(target.parent().unwrap())
        .unwrap()
        .collect();
    assert_eq!(leftovers.len(), 1);
}
