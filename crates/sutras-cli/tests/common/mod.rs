#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::json;
use sutras_util::hash::sha256_bytes;
use tempfile::TempDir;

/// A scratch `SUTRAS_HOME`, registry and project directory.
pub struct Sandbox {
    pub home: TempDir,
    pub registry: TempDir,
    pub project: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            registry: TempDir::new().unwrap(),
            project: TempDir::new().unwrap(),
        }
    }

    /// `sutras` running in the project directory against this sandbox's home.
    #[allow(deprecated)]
    pub fn sutras(&self) -> Command {
        let mut cmd = Command::cargo_bin("sutras").unwrap();
        cmd.current_dir(self.project.path())
            .env("SUTRAS_HOME", self.home.path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Register the sandbox registry as `local`.
    pub fn with_local_registry(self) -> Self {
        self.sutras()
            .args(["registry", "add", "local"])
            .arg(self.registry.path())
            .assert()
            .success();
        self
    }

    /// Publish `name@version` with a tarball and checksum.
    pub fn publish(&self, name: &str, version: &str, deps: &[(&str, &str)]) {
        let root = self.registry.path();
        let fs_name = name.trim_start_matches('@').replace('/', "_");
        let tarball = format!("tarballs/{fs_name}-{version}.tar.gz");
        let data = format!("{name}@{version}");
        std::fs::create_dir_all(root.join("tarballs")).unwrap();
        std::fs::write(root.join(&tarball), &data).unwrap();

        let index_dir = root.join("index");
        std::fs::create_dir_all(&index_dir).unwrap();
        let index_path = index_dir.join(format!("{fs_name}.json"));
        let mut index = match std::fs::read_to_string(&index_path) {
            Ok(content) => serde_json::from_str(&content).unwrap(),
            Err(_) => json!({ "name": name, "versions": {} }),
        };
        let dependencies: Vec<_> = deps
            .iter()
            .map(|(dep, constraint)| json!({ "name": dep, "version": constraint }))
            .collect();
        index["versions"][version] = json!({
            "tarball_url": tarball,
            "checksum": format!("sha256:{}", sha256_bytes(data.as_bytes())),
            "dependencies": dependencies,
        });
        std::fs::write(&index_path, serde_json::to_string_pretty(&index).unwrap()).unwrap();
    }

    /// Write the project's `skill.toml`.
    pub fn manifest(&self, name: &str, version: &str, deps: &[(&str, &str)]) {
        let entries: Vec<String> = deps
            .iter()
            .map(|(dep, constraint)| format!("    {{ name = \"{dep}\", version = \"{constraint}\" }},"))
            .collect();
        std::fs::write(
            self.project.path().join("skill.toml"),
            format!(
                "[skill]\nname = \"{name}\"\nversion = \"{version}\"\n\n[capabilities]\ndependencies = [\n{}\n]\n",
                entries.join("\n")
            ),
        )
        .unwrap();
    }

    pub fn project_file(&self, name: &str) -> PathBuf {
        self.project.path().join(name)
    }

    pub fn home_path(&self) -> &Path {
        self.home.path()
    }
}
