//! Filesystem-backed registry provider over one or more configured registries.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use sutras_core::config::GlobalConfig;
use sutras_resolver::{RegistryManifest, RegistryProvider, ResolvedSkill};
use sutras_util::errors::{SutrasError, SutrasResult};

use crate::cache::ArtifactCache;
use crate::checksum;
use crate::index::SkillIndex;
use crate::repository::SkillRepository;

/// Registries searched in priority order (highest first, ties by name).
///
/// Index files are read at most once per registry and skill for the lifetime
/// of the value.
pub struct LocalRegistry {
    repos: Vec<SkillRepository>,
    indexes: RefCell<HashMap<(String, String), Option<Rc<SkillIndex>>>>,
}

/// A tarball placed in the artifact cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedArtifact {
    pub path: PathBuf,
    /// Already present (and verified) before this fetch.
    pub cached: bool,
}

impl LocalRegistry {
    pub fn new(mut repos: Vec<SkillRepository>) -> Self {
        repos.sort_by(|a, b| b.priority.cmp(&a.priority).then_with(|| a.name.cmp(&b.name)));
        Self {
            repos,
            indexes: RefCell::new(HashMap::new()),
        }
    }

    /// Every enabled registry from the global configuration.
    pub fn from_config(config: &GlobalConfig) -> SutrasResult<Self> {
        let repos = config
            .registries
            .iter()
            .filter(|(_, entry)| entry.enabled)
            .map(|(name, entry)| SkillRepository::from_entry(name, entry))
            .collect::<SutrasResult<Vec<_>>>()?;
        tracing::debug!("using {} enabled registries", repos.len());
        Ok(Self::new(repos))
    }

    /// Registries in search order.
    pub fn repositories(&self) -> &[SkillRepository] {
        &self.repos
    }

    /// A registry by name.
    pub fn repository(&self, name: &str) -> SutrasResult<&SkillRepository> {
        self.repos
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| SutrasError::Registry {
                message: format!("Registry '{name}' is not configured or is disabled"),
            })
    }

    fn index_in(&self, repo: &SkillRepository, name: &str) -> SutrasResult<Option<Rc<SkillIndex>>> {
        let key = (repo.name.clone(), name.to_string());
        if let Some(cached) = self.indexes.borrow().get(&key) {
            return Ok(cached.clone());
        }

        let path = repo.index_path(name)?;
        let index = SkillIndex::load(&path)?.map(Rc::new);
        if let Some(index) = &index {
            if index.name != name {
                tracing::warn!(
                    "index {} declares name '{}' but was looked up as '{name}'",
                    path.display(),
                    index.name
                );
            }
        }
        self.indexes.borrow_mut().insert(key, index.clone());
        Ok(index)
    }

    /// The registry serving `name` and its index.
    ///
    /// With a hint only that registry is consulted; otherwise the first
    /// registry in search order that serves and indexes the skill wins.
    fn locate(
        &self,
        name: &str,
        hint: Option<&str>,
    ) -> SutrasResult<(&SkillRepository, Rc<SkillIndex>)> {
        let candidates: Vec<&SkillRepository> = match hint {
            Some(registry) => vec![self.repository(registry)?],
            None => self.repos.iter().filter(|r| r.serves(name)).collect(),
        };
        for repo in candidates {
            if let Some(index) = self.index_in(repo, name)? {
                tracing::debug!("found {name} in registry {}", repo.name);
                return Ok((repo, index));
            }
        }
        Err(SutrasError::SkillNotFound {
            name: name.to_string(),
            constraint: None,
        })
    }

    /// Copy a resolved skill's tarball into `cache`, verifying its checksum.
    ///
    /// A cached copy is reused when it still matches the expected checksum.
    pub fn fetch(&self, skill: &ResolvedSkill, cache: &ArtifactCache) -> SutrasResult<FetchedArtifact> {
        let version = skill.version.to_string();
        let url = skill
            .tarball_url
            .as_deref()
            .ok_or_else(|| SutrasError::Registry {
                message: format!("Skill '{}' {version} has no tarball_url", skill.name),
            })?;
        let repo = match skill.registry.as_deref() {
            Some(registry) => self.repository(registry)?,
            None => self.locate(&skill.name, None)?.0,
        };
        let source = repo.tarball_path(url)?;
        let filename = source
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| SutrasError::Registry {
                message: format!("Invalid tarball_url '{url}' for '{}'", skill.name),
            })?
            .to_string();

        if let Some(cached) = cache.get(&skill.name, &version, &filename) {
            match &skill.checksum {
                Some(expected) => match checksum::verify_file(&cached, expected) {
                    Ok(()) => {
                        return Ok(FetchedArtifact {
                            path: cached,
                            cached: true,
                        })
                    }
                    Err(e) => tracing::warn!("re-fetching {}: {e}", skill.name),
                },
                None => {
                    return Ok(FetchedArtifact {
                        path: cached,
                        cached: true,
                    })
                }
            }
        }

        let data = std::fs::read(&source).map_err(|e| SutrasError::Registry {
            message: format!("Failed to read tarball {}: {e}", source.display()),
        })?;
        if let Some(expected) = &skill.checksum {
            checksum::verify(&data, expected, &source.display().to_string())?;
        }
        let path = cache.put(&skill.name, &version, &filename, &data)?;
        tracing::debug!("cached {} {version} at {}", skill.name, path.display());
        Ok(FetchedArtifact {
            path,
            cached: false,
        })
    }
}

impl RegistryProvider for LocalRegistry {
    fn list_versions(&self, name: &str, registry: Option<&str>) -> SutrasResult<Vec<String>> {
        let (_, index) = self.locate(name, registry)?;
        Ok(index.version_strings())
    }

    fn fetch_manifest(
        &self,
        name: &str,
        version: &str,
        registry: Option<&str>,
    ) -> SutrasResult<RegistryManifest> {
        let (repo, index) = self.locate(name, registry)?;
        let entry = index.entry(version).ok_or_else(|| SutrasError::Registry {
            message: format!(
                "Version '{version}' of '{name}' not found in registry '{}'",
                repo.name
            ),
        })?;
        Ok(RegistryManifest {
            registry: Some(repo.name.clone()),
            tarball_url: entry.tarball_url.clone(),
            checksum: entry.checksum.clone(),
            dependencies: entry.dependencies.clone(),
        })
    }
}
