use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sutras_util::errors::{SutrasError, SutrasResult};

/// Environment variable overriding the Sutras data directory.
pub const HOME_ENV: &str = "SUTRAS_HOME";

/// Global user configuration loaded from `~/.sutras/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default, rename = "default-registry", skip_serializing_if = "Option::is_none")]
    pub default_registry: Option<String>,

    #[serde(default, rename = "cache-dir", skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<String>,

    #[serde(default, rename = "skills-dir", skip_serializing_if = "Option::is_none")]
    pub skills_dir: Option<String>,

    #[serde(default)]
    pub registries: BTreeMap<String, RegistryConfigEntry>,
}

/// A named skill registry from `[registries.<name>]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfigEntry {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, rename = "auth-token", skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RegistryConfigEntry {
    /// An enabled registry at `url` with default priority.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            namespace: None,
            auth_token: None,
            priority: 0,
            enabled: true,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl GlobalConfig {
    /// Load the global configuration from the default path, or return defaults if the file doesn't exist.
    pub fn load() -> SutrasResult<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load the configuration from `path`; a missing file yields defaults.
    pub fn load_from(path: &Path) -> SutrasResult<Self> {
        if !path.is_file() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| SutrasError::Config {
            message: format!("Failed to read global config: {e}"),
        })?;
        toml::from_str(&content).map_err(|e| SutrasError::Config {
            message: format!("Failed to parse global config: {e}"),
        })
    }

    /// Save to the default path.
    pub fn save(&self) -> SutrasResult<()> {
        self.save_to(&Self::default_path())
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> SutrasResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| SutrasError::Config {
            message: format!("Failed to serialize global config: {e}"),
        })?;
        sutras_util::fs::write_atomic(path, content.as_bytes()).map_err(|e| SutrasError::Config {
            message: format!("Failed to write {}: {e}", path.display()),
        })
    }

    /// Returns the default path to the global config file.
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }

    /// Register (or replace) a registry.
    ///
    /// The first registry added becomes the default; later ones only do when
    /// `set_default` is true.
    pub fn add_registry(&mut self, name: &str, entry: RegistryConfigEntry, set_default: bool) {
        self.registries.insert(name.to_string(), entry);
        if set_default || self.default_registry.is_none() {
            self.default_registry = Some(name.to_string());
        }
    }

    /// Remove a registry. If it was the default, the first remaining
    /// registry (by name) takes over.
    pub fn remove_registry(&mut self, name: &str) -> SutrasResult<RegistryConfigEntry> {
        let removed = self
            .registries
            .remove(name)
            .ok_or_else(|| registry_not_found(name))?;
        if self.default_registry.as_deref() == Some(name) {
            self.default_registry = self.registries.keys().next().cloned();
        }
        Ok(removed)
    }

    /// Look up a registry by name.
    pub fn get_registry(&self, name: &str) -> SutrasResult<&RegistryConfigEntry> {
        self.registries
            .get(name)
            .ok_or_else(|| registry_not_found(name))
    }

    /// Names of all configured registries, sorted.
    pub fn list_registries(&self) -> Vec<&str> {
        self.registries.keys().map(String::as_str).collect()
    }

    /// Directory holding cached registry artifacts.
    pub fn cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => expand_home(dir),
            None => dirs_path().join("registry-cache"),
        }
    }

    /// Directory holding installed skills.
    pub fn skills_dir(&self) -> PathBuf {
        match &self.skills_dir {
            Some(dir) => expand_home(dir),
            None => dirs_path().join("skills"),
        }
    }

    /// Directory holding install records.
    pub fn installed_dir(&self) -> PathBuf {
        dirs_path().join("installed")
    }
}

fn registry_not_found(name: &str) -> SutrasError {
    SutrasError::Config {
        message: format!("Registry '{name}' not found"),
    }
}

/// Returns the path to the Sutras data directory (`$SUTRAS_HOME` or `~/.sutras/`).
pub fn dirs_path() -> PathBuf {
    if let Ok(home) = std::env::var(HOME_ENV) {
        if !home.is_empty() {
            return PathBuf::from(home);
        }
    }
    user_home().join(".sutras")
}

fn user_home() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => user_home().join(rest),
        None => PathBuf::from(path),
    }
}
