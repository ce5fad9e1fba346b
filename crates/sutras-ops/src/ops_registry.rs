//! Operations: manage the registries in the global configuration.

use std::path::Path;

use sutras_core::config::{GlobalConfig, RegistryConfigEntry};
use sutras_core::naming::{validate_namespace, validate_skill_name};
use sutras_registry::repository::SkillRepository;
use sutras_util::errors::SutrasResult;
use sutras_util::progress::status;

/// Options for `sutras registry add`.
#[derive(Debug, Default)]
pub struct RegistryAddOptions {
    pub name: String,
    pub url: String,
    pub namespace: Option<String>,
    pub priority: i32,
    /// Make this the default registry even if another one already is.
    pub set_default: bool,
}

/// Add (or replace) a registry in the configuration at `config_path`.
pub fn add_registry(config_path: &Path, opts: &RegistryAddOptions) -> SutrasResult<GlobalConfig> {
    validate_skill_name(&opts.name)?;
    let mut entry = RegistryConfigEntry::new(opts.url.trim()).with_priority(opts.priority);
    if let Some(namespace) = &opts.namespace {
        let namespace = namespace.trim_start_matches('@');
        validate_namespace(namespace)?;
        entry = entry.with_namespace(namespace);
    }
    // Reject locations the local registry cannot read before persisting them.
    SkillRepository::from_entry(&opts.name, &entry)?;

    let mut config = GlobalConfig::load_from(config_path)?;
    if config.registries.contains_key(&opts.name) {
        tracing::info!("replacing registry '{}'", opts.name);
    }
    config.add_registry(&opts.name, entry, opts.set_default);
    config.save_to(config_path)?;
    Ok(config)
}

/// Remove a registry from the configuration at `config_path`.
pub fn remove_registry(config_path: &Path, name: &str) -> SutrasResult<GlobalConfig> {
    let mut config = GlobalConfig::load_from(config_path)?;
    config.remove_registry(name)?;
    config.save_to(config_path)?;
    Ok(config)
}

/// One line per configured registry, sorted by name; the default is marked
/// with `*`.
pub fn render_registries(config: &GlobalConfig) -> String {
    let mut output = String::new();
    for name in config.list_registries() {
        let Some(entry) = config.registries.get(name) else {
            continue;
        };
        let marker = if config.default_registry.as_deref() == Some(name) {
            "*"
        } else {
            " "
        };
        output.push_str(&format!("{marker} {name} {}", entry.url));
        if let Some(namespace) = &entry.namespace {
            output.push_str(&format!(" (namespace @{namespace})"));
        }
        if entry.priority != 0 {
            output.push_str(&format!(" (priority {})", entry.priority));
        }
        if !entry.enabled {
            output.push_str(" (disabled)");
        }
        output.push('\n');
    }
    output
}

/// `sutras registry add`.
pub fn add(config_path: &Path, opts: &RegistryAddOptions) -> miette::Result<()> {
    let config = add_registry(config_path, opts)?;
    let note = if config.default_registry.as_deref() == Some(opts.name.as_str()) {
        " (default)"
    } else {
        ""
    };
    status("Added", &format!("registry {} at {}{note}", opts.name, opts.url));
    Ok(())
}

/// `sutras registry remove`.
pub fn remove(config_path: &Path, name: &str) -> miette::Result<()> {
    let config = remove_registry(config_path, name)?;
    status("Removed", &format!("registry {name}"));
    if let Some(default) = &config.default_registry {
        tracing::debug!("default registry is now {default}");
    }
    Ok(())
}

/// `sutras registry list`.
pub fn list(config_path: &Path) -> miette::Result<()> {
    let config = GlobalConfig::load_from(config_path)?;
    let output = render_registries(&config);
    if output.is_empty() {
        println!("No registries configured.");
    } else {
        print!("{output}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sutras_util::errors::SutrasError;
    use tempfile::TempDir;

    fn opts(name: &str, url: &str) -> RegistryAddOptions {
        RegistryAddOptions {
            name: name.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn first_registry_becomes_default() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        add_registry(&path, &opts("local", "/srv/skills")).unwrap();
        let config = add_registry(&path, &opts("team", "file:///srv/team")).unwrap();
        assert_eq!(config.default_registry.as_deref(), Some("local"));

        let reloaded = GlobalConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.list_registries(), vec!["local", "team"]);
    }

    #[test]
    fn explicit_default_and_namespace() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        add_registry(&path, &opts("local", "/srv/skills")).unwrap();

        let config = add_registry(
            &path,
            &RegistryAddOptions {
                namespace: Some("@acme".into()),
                priority: 5,
                set_default: true,
                ..opts("acme", "/srv/acme")
            },
        )
        .unwrap();
        assert_eq!(config.default_registry.as_deref(), Some("acme"));
        let entry = config.get_registry("acme").unwrap();
        assert_eq!(entry.namespace.as_deref(), Some("acme"));
        assert_eq!(entry.priority, 5);

        assert_eq!(
            render_registries(&config),
            "* acme /srv/acme (namespace @acme) (priority 5)\n  local /srv/skills\n"
        );
    }

    #[test]
    fn rejects_network_url() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        let err = add_registry(&path, &opts("remote", "https://skills.example.com")).unwrap_err();
        assert!(matches!(err, SutrasError::Registry { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn rejects_invalid_names() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        assert!(add_registry(&path, &opts("bad name", "/srv")).is_err());
        let err = add_registry(
            &path,
            &RegistryAddOptions {
                namespace: Some("a.b".into()),
                ..opts("local", "/srv")
            },
        )
        .unwrap_err();
        assert!(matches!(err, SutrasError::InvalidName { .. }));
    }

    #[test]
    fn removing_default_promotes_next() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        add_registry(&path, &opts("beta", "/srv/beta")).unwrap();
        add_registry(&path, &opts("alpha", "/srv/alpha")).unwrap();
        add_registry(&path, &opts("gamma", "/srv/gamma")).unwrap();

        let config = remove_registry(&path, "beta").unwrap();
        assert_eq!(config.default_registry.as_deref(), Some("alpha"));

        let err = remove_registry(&path, "beta").unwrap_err();
        assert!(matches!(err, SutrasError::Config { .. }));
    }
}
