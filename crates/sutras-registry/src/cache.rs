//! Artifact cache for fetched skill tarballs.

use std::path::{Path, PathBuf};

use sutras_core::naming::SkillName;
use sutras_util::errors::SutrasResult;

/// Cache of fetched tarballs at `<cache-dir>/<filesystem-name>/<version>/`.
#[derive(Debug, Clone)]
pub struct ArtifactCache {
    root: PathBuf,
}

impl ArtifactCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of this cache.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the artifacts of one skill version.
    pub fn artifact_dir(&self, name: &str, version: &str) -> SutrasResult<PathBuf> {
        let fs_name = SkillName::parse(name)?.to_filesystem_name();
        Ok(self.root.join(fs_name).join(version))
    }

    /// Path of a cached file, if present.
    pub fn get(&self, name: &str, version: &str, filename: &str) -> Option<PathBuf> {
        let path = self.artifact_dir(name, version).ok()?.join(filename);
        path.is_file().then_some(path)
    }

    /// Store artifact data in the cache, creating directories as needed.
    pub fn put(
        &self,
        name: &str,
        version: &str,
        filename: &str,
        data: &[u8],
    ) -> SutrasResult<PathBuf> {
        let path = self.artifact_dir(name, version)?.join(filename);
        sutras_util::fs::write_atomic(&path, data)?;
        Ok(path)
    }
}
