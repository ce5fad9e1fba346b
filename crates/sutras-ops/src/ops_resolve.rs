//! Operation: resolve the project's dependencies and print the install order.

use std::path::Path;

use sutras_core::config::GlobalConfig;
use sutras_core::lockfile::{Lockfile, LOCKFILE_NAME};
use sutras_core::manifest::{SkillManifest, MANIFEST_FILE};
use sutras_registry::LocalRegistry;
use sutras_resolver::graph::{DependencyGraph, SkillNode};
use sutras_resolver::{Resolution, Resolver};
use sutras_util::errors::{SutrasError, SutrasResult};
use sutras_util::progress::{spinner, status, status_info};

/// Options for `sutras resolve`.
#[derive(Debug, Default)]
pub struct ResolveOptions {
    /// Print the resolved skills as JSON instead of one per line.
    pub json: bool,
    /// Ignore versions pinned in `sutras.lock`.
    pub no_lock: bool,
}

/// A project manifest together with its resolved dependencies.
#[derive(Debug)]
pub struct ProjectResolution {
    pub manifest: SkillManifest,
    pub resolution: Resolution,
}

impl ProjectResolution {
    /// Dependency graph rooted at the project itself.
    pub fn graph(&self) -> DependencyGraph {
        let root = SkillNode::new(&self.manifest.skill.name, &self.manifest.skill.version);
        self.resolution.graph(Some(root))
    }
}

/// Load `skill.toml` from `project_root`.
pub fn load_manifest(project_root: &Path) -> SutrasResult<SkillManifest> {
    SkillManifest::from_path(&project_root.join(MANIFEST_FILE))
}

/// Resolve the project at `project_root` against the registries in `config`.
///
/// With `use_lockfile`, versions pinned in `sutras.lock` are preferred
/// whenever they still satisfy the requested constraints.
pub fn resolve_project(
    project_root: &Path,
    config: &GlobalConfig,
    use_lockfile: bool,
) -> SutrasResult<ProjectResolution> {
    let manifest = load_manifest(project_root)?;
    let requests = manifest.dependency_requests()?;
    let registry = LocalRegistry::from_config(config)?;

    let lockfile = if use_lockfile {
        Lockfile::load_if_present(&project_root.join(LOCKFILE_NAME))?
    } else {
        None
    };

    let mut resolver = Resolver::new(&registry);
    if let Some(lockfile) = &lockfile {
        tracing::debug!("honouring {} pins from {LOCKFILE_NAME}", lockfile.skill.len());
        resolver = resolver.with_lockfile(lockfile);
    }

    let resolution = resolver.resolve(&requests)?;
    tracing::info!(
        "resolved {} skills for {}",
        resolution.len(),
        manifest.skill.name
    );
    Ok(ProjectResolution {
        manifest,
        resolution,
    })
}

/// Render the install order: one `name vX.Y.Z` line per skill, or a JSON
/// array of resolved skills in the same order.
pub fn render_install_order(resolution: &Resolution, json: bool) -> SutrasResult<String> {
    if json {
        return serde_json::to_string_pretty(&resolution.skills).map_err(|e| {
            SutrasError::Generic {
                message: format!("Failed to serialize resolution: {e}"),
            }
        });
    }
    Ok(resolution
        .skills
        .iter()
        .map(|skill| format!("{} v{}\n", skill.name, skill.version))
        .collect())
}

/// Resolve the project and print its install order.
pub fn resolve(project_root: &Path, config: &GlobalConfig, opts: &ResolveOptions) -> miette::Result<()> {
    let sp = spinner("Resolving dependencies...");
    let result = resolve_project(project_root, config, !opts.no_lock);
    sp.finish_and_clear();
    let project = result?;

    let output = render_install_order(&project.resolution, opts.json)?;
    if opts.json {
        println!("{output}");
        return Ok(());
    }

    if project.resolution.is_empty() {
        status_info("Resolved", "no dependencies");
    } else {
        print!("{output}");
        status(
            "Resolved",
            &format!("{} skills for {}", project.resolution.len(), project.manifest.skill.name),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{config_for, publish, write_manifest};
    use sutras_core::lockfile::LockedSkill;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, TempDir, GlobalConfig) {
        let registry = TempDir::new().unwrap();
        publish(registry.path(), "@acme/base", "1.0.0", &[]);
        publish(registry.path(), "@acme/base", "1.4.0", &[]);
        publish(registry.path(), "@acme/text", "2.1.0", &[("@acme/base", "^1.0.0")]);

        let project = TempDir::new().unwrap();
        write_manifest(project.path(), "@acme/app", "0.1.0", &[("@acme/text", "^2.0.0")]);

        let config = config_for(registry.path(), &project.path().join("cache"));
        (registry, project, config)
    }

    #[test]
    fn resolves_in_install_order() {
        let (_registry, project, config) = fixture();
        let resolved = resolve_project(project.path(), &config, true).unwrap();
        let text = render_install_order(&resolved.resolution, false).unwrap();
        assert_eq!(text, "@acme/base v1.4.0\n@acme/text v2.1.0\n");
    }

    #[test]
    fn json_lists_resolved_skills() {
        let (_registry, project, config) = fixture();
        let resolved = resolve_project(project.path(), &config, true).unwrap();
        let json = render_install_order(&resolved.resolution, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "@acme/base");
        assert_eq!(value[1]["version"], "2.1.0");
        assert_eq!(value[1]["registry"], "local");
        assert_eq!(value[1]["dependencies"][0], "@acme/base");
    }

    #[test]
    fn lockfile_pin_is_honoured_unless_disabled() {
        let (_registry, project, config) = fixture();
        Lockfile::generate(vec![LockedSkill {
            name: "@acme/base".into(),
            version: "1.0.0".into(),
            registry: None,
            tarball_url: None,
            checksum: None,
            dependencies: vec![],
        }])
        .write_to(&project.path().join(LOCKFILE_NAME))
        .unwrap();

        let pinned = resolve_project(project.path(), &config, true).unwrap();
        assert_eq!(pinned.resolution.get("@acme/base").unwrap().version.to_string(), "1.0.0");

        let fresh = resolve_project(project.path(), &config, false).unwrap();
        assert_eq!(fresh.resolution.get("@acme/base").unwrap().version.to_string(), "1.4.0");
    }

    #[test]
    fn graph_is_rooted_at_project() {
        let (_registry, project, config) = fixture();
        let resolved = resolve_project(project.path(), &config, true).unwrap();
        let tree = resolved.graph().print_tree(None);
        assert_eq!(
            tree,
            "@acme/app v0.1.0\n└── @acme/text v2.1.0\n    └── @acme/base v1.4.0\n"
        );
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_manifest(tmp.path()).unwrap_err();
        assert!(matches!(err, SutrasError::Manifest { .. }));
    }
}
