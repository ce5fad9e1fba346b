mod common;

use common::Sandbox;
use predicates::prelude::*;

fn published() -> Sandbox {
    let sandbox = Sandbox::new().with_local_registry();
    sandbox.publish("@acme/base", "1.0.0", &[]);
    sandbox.publish("@acme/base", "1.3.0", &[]);
    sandbox.publish("@acme/base", "2.0.0", &[]);
    sandbox.publish("@acme/text", "1.1.0", &[("@acme/base", "^1.0.0")]);
    sandbox.manifest("@acme/app", "0.1.0", &[("@acme/text", "^1.0.0")]);
    sandbox
}

#[test]
fn test_resolve_without_manifest_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .sutras()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No skill.toml found"));
}

#[test]
fn test_resolve_prints_install_order() {
    published()
        .sutras()
        .arg("resolve")
        .assert()
        .success()
        .stdout("@acme/base v1.3.0\n@acme/text v1.1.0\n");
}

#[test]
fn test_resolve_json() {
    let output = published()
        .sutras()
        .args(["resolve", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let skills: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(skills.as_array().unwrap().len(), 2);
    assert_eq!(skills[0]["name"], "@acme/base");
    assert_eq!(skills[0]["version"], "1.3.0");
}

#[test]
fn test_lock_then_resolve_uses_pins() {
    let sandbox = published();
    sandbox.sutras().arg("lock").assert().success();

    let lock = std::fs::read_to_string(sandbox.project_file("sutras.lock")).unwrap();
    assert!(lock.contains("name = \"@acme/base\""));
    assert!(lock.contains("version = \"1.3.0\""));

    // A newer compatible release does not move the pin.
    sandbox.publish("@acme/base", "1.4.0", &[]);
    sandbox
        .sutras()
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("@acme/base v1.3.0"));
    sandbox
        .sutras()
        .args(["resolve", "--no-lock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@acme/base v1.4.0"));
}

#[test]
fn test_tree() {
    published()
        .sutras()
        .arg("tree")
        .assert()
        .success()
        .stdout("@acme/app v0.1.0\n└── @acme/text v1.1.0\n    └── @acme/base v1.3.0\n");
}

#[test]
fn test_tree_why() {
    published()
        .sutras()
        .args(["tree", "--why", "@acme/base"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Path to @acme/base:\n"));
}

#[test]
fn test_cycle_is_reported() {
    let sandbox = Sandbox::new().with_local_registry();
    sandbox.publish("@acme/a", "1.0.0", &[("@acme/b", "*")]);
    sandbox.publish("@acme/b", "1.0.0", &[("@acme/a", "*")]);
    sandbox.manifest("@acme/app", "0.1.0", &[("@acme/a", "*")]);

    sandbox
        .sutras()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Circular dependency detected"));
}

#[test]
fn test_conflict_is_reported() {
    let sandbox = published();
    sandbox.publish("@acme/pdf", "1.0.0", &[("@acme/base", "^2.0.0")]);
    sandbox.manifest(
        "@acme/app",
        "0.1.0",
        &[("@acme/text", "^1.0.0"), ("@acme/pdf", "1.0.0")],
    );

    sandbox
        .sutras()
        .arg("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dependency conflict"));
}

#[test]
fn test_check() {
    let sandbox = published();
    sandbox
        .sutras()
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("@acme/app v0.1.0"));

    sandbox.manifest("@acme/app", "0.1", &[]);
    sandbox
        .sutras()
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version format"));
}

#[test]
fn test_fetch_copies_archives() {
    let sandbox = published();
    sandbox.sutras().arg("fetch").assert().success();

    let cached = sandbox
        .home_path()
        .join("registry-cache")
        .join("acme_base")
        .join("1.3.0")
        .join("acme_base-1.3.0.tar.gz");
    assert_eq!(std::fs::read_to_string(cached).unwrap(), "@acme/base@1.3.0");
}

#[test]
fn test_resolve_from_subdirectory() {
    let sandbox = published();
    let nested = sandbox.project_file("prompts").join("drafts");
    std::fs::create_dir_all(&nested).unwrap();
    sandbox
        .sutras()
        .current_dir(&nested)
        .arg("resolve")
        .assert()
        .success()
        .stdout(predicate::str::contains("@acme/text v1.1.0"));
}
