//! Per-skill version index stored as JSON in a registry.
//!
//! ```json
//! {
//!   "name": "@acme/text-utils",
//!   "versions": {
//!     "1.0.0": {
//!       "tarball_url": "tarballs/acme_text-utils-1.0.0.tar.gz",
//!       "checksum": "sha256:…",
//!       "dependencies": ["@acme/tokenizer"]
//!     }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sutras_core::dependency::DependencySpec;
use sutras_util::errors::{SutrasError, SutrasResult};

/// All published versions of one skill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillIndex {
    pub name: String,
    #[serde(default)]
    pub versions: BTreeMap<String, IndexEntry>,
}

/// Metadata for a single published version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

impl SkillIndex {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            versions: BTreeMap::new(),
        }
    }

    /// Load an index file; `None` if it does not exist.
    pub fn load(path: &Path) -> SutrasResult<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
            .map(Some)
            .map_err(|e| SutrasError::Registry {
                message: format!("Invalid index {}: {e}", path.display()),
            })
    }

    pub fn from_json(content: &str) -> SutrasResult<Self> {
        serde_json::from_str(content).map_err(|e| SutrasError::Registry {
            message: format!("Failed to parse registry index: {e}"),
        })
    }

    pub fn to_json_pretty(&self) -> SutrasResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SutrasError::Registry {
            message: format!("Failed to serialize registry index: {e}"),
        })
    }

    /// Atomically write the index to `path`.
    pub fn write_to(&self, path: &Path) -> SutrasResult<()> {
        let content = self.to_json_pretty()?;
        sutras_util::fs::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    /// Add or replace one version.
    pub fn insert(&mut self, version: impl Into<String>, entry: IndexEntry) {
        self.versions.insert(version.into(), entry);
    }

    /// Published version strings, as written in the index.
    pub fn version_strings(&self) -> Vec<String> {
        self.versions.keys().cloned().collect()
    }

    pub fn entry(&self, version: &str) -> Option<&IndexEntry> {
        self.versions.get(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mixed_dependency_forms() {
        let index = SkillIndex::from_json(
            r#"{
                "name": "@acme/summarize",
                "versions": {
                    "0.3.0": {
                        "tarball_url": "tarballs/summarize-0.3.0.tar.gz",
                        "dependencies": [
                            "@acme/text-utils",
                            {"name": "@acme/tokenizer", "version": "^1.2.0", "optional": true}
                        ]
                    },
                    "0.2.0": {}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(index.name, "@acme/summarize");
        assert_eq!(index.version_strings(), vec!["0.2.0", "0.3.0"]);
        let entry = index.entry("0.3.0").unwrap();
        assert_eq!(entry.dependencies.len(), 2);
        assert!(entry.checksum.is_none());
        assert!(index.entry("0.2.0").unwrap().dependencies.is_empty());
    }

    #[test]
    fn invalid_json_is_registry_error() {
        let err = SkillIndex::from_json("{ not json").unwrap_err();
        assert!(err.to_string().starts_with("Registry error"), "{err}");
    }

    #[test]
    fn missing_file_loads_as_none() {
        let tmp = tempfile::TempDir::new().unwrap();
        assert!(SkillIndex::load(&tmp.path().join("none.json"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn write_then_load() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("index").join("solo.json");
        let mut index = SkillIndex::new("solo");
        index.insert(
            "1.0.0",
            IndexEntry {
                checksum: Some("sha256:00".into()),
                ..IndexEntry::default()
            },
        );
        index.write_to(&path).unwrap();
        assert_eq!(SkillIndex::load(&path).unwrap(), Some(index));
    }
}
