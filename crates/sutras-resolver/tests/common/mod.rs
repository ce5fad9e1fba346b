use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use sutras_core::dependency::DependencySpec;
use sutras_resolver::{RegistryManifest, RegistryProvider};
use sutras_util::errors::{SutrasError, SutrasResult};

/// An in-memory registry: name → version → dependency specs.
#[derive(Default)]
pub struct MemoryRegistry {
    skills: BTreeMap<String, BTreeMap<String, Vec<DependencySpec>>>,
    listed: RefCell<Vec<String>>,
    corrupt: BTreeSet<String>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish `name@version` depending on `deps` (`(name, constraint)` pairs).
    pub fn publish(mut self, name: &str, version: &str, deps: &[(&str, &str)]) -> Self {
        let specs = deps
            .iter()
            .map(|(dep, constraint)| detailed(dep, constraint, false))
            .collect();
        self.publish_specs(name, version, specs);
        self
    }

    pub fn publish_specs(&mut self, name: &str, version: &str, specs: Vec<DependencySpec>) {
        self.skills
            .entry(name.to_string())
            .or_default()
            .insert(version.to_string(), specs);
    }

    /// Make every lookup of `name` fail as if its index were unreadable.
    pub fn corrupt(mut self, name: &str) -> Self {
        self.corrupt.insert(name.to_string());
        self
    }

    /// Names whose version list was requested, in order.
    pub fn listed(&self) -> Vec<String> {
        self.listed.borrow().clone()
    }
}

pub fn detailed(name: &str, constraint: &str, optional: bool) -> DependencySpec {
    DependencySpec::Detailed(sutras_core::dependency::DetailedDependency {
        name: Some(name.to_string()),
        version: Some(constraint.to_string()),
        optional,
        registry: None,
    })
}

impl RegistryProvider for MemoryRegistry {
    fn list_versions(&self, name: &str, _registry: Option<&str>) -> SutrasResult<Vec<String>> {
        self.listed.borrow_mut().push(name.to_string());
        if self.corrupt.contains(name) {
            return Err(SutrasError::Registry {
                message: format!("Invalid index for '{name}': EOF while parsing"),
            });
        }
        self.skills
            .get(name)
            .map(|versions| versions.keys().cloned().collect())
            .ok_or_else(|| SutrasError::SkillNotFound {
                name: name.to_string(),
                constraint: None,
            })
    }

    fn fetch_manifest(
        &self,
        name: &str,
        version: &str,
        registry: Option<&str>,
    ) -> SutrasResult<RegistryManifest> {
        let dependencies = self
            .skills
            .get(name)
            .and_then(|versions| versions.get(version))
            .cloned()
            .ok_or_else(|| SutrasError::SkillNotFound {
                name: name.to_string(),
                constraint: Some(version.to_string()),
            })?;
        Ok(RegistryManifest {
            registry: registry.map(str::to_string),
            tarball_url: Some(format!("mem://{name}/{version}")),
            checksum: None,
            dependencies,
        })
    }
}
