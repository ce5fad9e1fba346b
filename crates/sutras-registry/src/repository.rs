//! Registry abstraction: location, layout and namespace scoping.

use std::path::{Path, PathBuf};

use sutras_core::config::RegistryConfigEntry;
use sutras_core::naming::SkillName;
use sutras_util::errors::{SutrasError, SutrasResult};

/// Directory under a registry root holding one index file per skill.
pub const INDEX_DIR: &str = "index";

/// A configured registry rooted at a local directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRepository {
    pub name: String,
    pub root: PathBuf,
    pub namespace: Option<String>,
    pub priority: i32,
}

impl SkillRepository {
    /// Build a repository from a `[registries.<name>]` entry.
    ///
    /// `file://` URLs and plain paths are accepted; network URLs are not.
    pub fn from_entry(name: &str, entry: &RegistryConfigEntry) -> SutrasResult<Self> {
        Ok(Self {
            name: name.to_string(),
            root: local_root(name, &entry.url)?,
            namespace: entry.namespace.clone(),
            priority: entry.priority,
        })
    }

    /// Whether this registry may serve `name`.
    ///
    /// A registry bound to a namespace only serves scoped names in that
    /// namespace; unscoped names are served by any registry.
    pub fn serves(&self, name: &str) -> bool {
        match (&self.namespace, SkillName::parse(name)) {
            (Some(ns), Ok(parsed)) => match parsed.namespace {
                Some(skill_ns) => &skill_ns == ns,
                None => true,
            },
            (None, _) => true,
            (Some(_), Err(_)) => false,
        }
    }

    /// `<root>/index/<filesystem-name>.json`.
    pub fn index_path(&self, name: &str) -> SutrasResult<PathBuf> {
        let parsed = SkillName::parse(name)?;
        Ok(self
            .root
            .join(INDEX_DIR)
            .join(format!("{}.json", parsed.to_filesystem_name())))
    }

    /// Resolve a tarball URL from this registry's index to a local file.
    ///
    /// Relative paths are taken relative to the registry root.
    pub fn tarball_path(&self, tarball_url: &str) -> SutrasResult<PathBuf> {
        let path = local_root(&self.name, tarball_url)?;
        Ok(if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        })
    }
}

fn local_root(registry: &str, url: &str) -> SutrasResult<PathBuf> {
    let url = url.trim();
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(PathBuf::from(path));
    }
    if url.contains("://") {
        return Err(SutrasError::Registry {
            message: format!(
                "Registry '{registry}' uses unsupported URL '{url}': only local paths and file:// URLs are supported"
            ),
        });
    }
    if url.is_empty() {
        return Err(SutrasError::Registry {
            message: format!("Registry '{registry}' has an empty URL"),
        });
    }
    Ok(Path::new(url).to_path_buf())
}
