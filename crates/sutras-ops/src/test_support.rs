//! Fixtures shared by the operation tests: a throwaway registry on disk and a
//! project directory holding a `skill.toml`.

use std::path::Path;

use sutras_core::config::{GlobalConfig, RegistryConfigEntry};
use sutras_core::dependency::{DependencySpec, DetailedDependency};
use sutras_core::manifest::MANIFEST_FILE;
use sutras_registry::index::{IndexEntry, SkillIndex};
use sutras_util::hash::sha256_bytes;

/// Publish `name@version` into the registry at `root`, with a small tarball
/// whose checksum is recorded in the index.
pub(crate) fn publish(root: &Path, name: &str, version: &str, deps: &[(&str, &str)]) {
    let fs_name = name.trim_start_matches('@').replace('/', "_");
    let tarball = format!("tarballs/{fs_name}-{version}.tar.gz");
    let data = format!("{name}@{version}");
    std::fs::create_dir_all(root.join("tarballs")).unwrap();
    std::fs::write(root.join(&tarball), &data).unwrap();

    let index_path = root.join("index").join(format!("{fs_name}.json"));
    let mut index = SkillIndex::load(&index_path)
        .unwrap()
        .unwrap_or_else(|| SkillIndex::new(name));
    index.insert(
        version,
        IndexEntry {
            tarball_url: Some(tarball),
            checksum: Some(format!("sha256:{}", sha256_bytes(data.as_bytes()))),
            dependencies: deps
                .iter()
                .map(|(dep, constraint)| {
                    DependencySpec::Detailed(DetailedDependency {
                        name: Some(dep.to_string()),
                        version: Some(constraint.to_string()),
                        ..Default::default()
                    })
                })
                .collect(),
        },
    );
    index.write_to(&index_path).unwrap();
}

/// Write a `skill.toml` for `name@version` depending on `deps`.
pub(crate) fn write_manifest(project: &Path, name: &str, version: &str, deps: &[(&str, &str)]) {
    let entries: Vec<String> = deps
        .iter()
        .map(|(dep, constraint)| format!("    {{ name = \"{dep}\", version = \"{constraint}\" }},"))
        .collect();
    let content = format!(
        "[skill]\nname = \"{name}\"\nversion = \"{version}\"\n\n[capabilities]\ndependencies = [\n{}\n]\n",
        entries.join("\n")
    );
    std::fs::write(project.join(MANIFEST_FILE), content).unwrap();
}

/// A configuration with a single registry named `local` rooted at `root`,
/// caching artifacts under `cache`.
pub(crate) fn config_for(root: &Path, cache: &Path) -> GlobalConfig {
    let mut config = GlobalConfig {
        cache_dir: Some(cache.to_string_lossy().into_owned()),
        ..Default::default()
    };
    config.add_registry("local", RegistryConfigEntry::new(root.to_string_lossy()), false);
    config
}
