//! Collaborators the resolver consults: registries and lockfiles.

use sutras_core::dependency::DependencySpec;
use sutras_core::lockfile::Lockfile;
use sutras_util::errors::{SutrasError, SutrasResult};

/// Metadata a registry reports for one published version of a skill.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryManifest {
    /// Registry that served the version, if the provider knows it.
    pub registry: Option<String>,
    pub tarball_url: Option<String>,
    pub checksum: Option<String>,
    pub dependencies: Vec<DependencySpec>,
}

/// A source of published skill versions.
///
/// `registry` is the caller's hint from the dependency declaration; providers
/// backed by a single registry may ignore it.
pub trait RegistryProvider {
    /// All published version strings of `name`, in any order.
    ///
    /// An unknown skill should fail with `SutrasError::SkillNotFound`.
    fn list_versions(&self, name: &str, registry: Option<&str>) -> SutrasResult<Vec<String>>;

    /// Metadata for one exact version.
    fn fetch_manifest(
        &self,
        name: &str,
        version: &str,
        registry: Option<&str>,
    ) -> SutrasResult<RegistryManifest>;

    /// Whether the registry can supply `name` at all.
    ///
    /// Only an unknown skill or an empty listing counts as unavailable; any
    /// other registry failure is returned as is.
    fn is_available(&self, name: &str, registry: Option<&str>) -> SutrasResult<bool> {
        match self.list_versions(name, registry) {
            Ok(versions) => Ok(!versions.is_empty()),
            Err(SutrasError::SkillNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// A source of previously pinned versions.
pub trait LockfileProvider {
    /// The pinned version string for `name`, if any.
    fn get_pinned(&self, name: &str) -> Option<String>;
}

impl LockfileProvider for Lockfile {
    fn get_pinned(&self, name: &str) -> Option<String> {
        self.locked_version(name).map(str::to_string)
    }
}
