use serde::{Deserialize, Serialize};
use std::path::Path;

use sutras_util::errors::{SutrasError, SutrasResult};

use crate::dependency::{self, DependencyRequest, DependencySpec, ROOT_SOURCE};
use crate::naming::SkillName;

/// File name of a skill manifest within a skill directory.
pub const MANIFEST_FILE: &str = "skill.toml";

/// The parsed representation of a `skill.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillManifest {
    pub skill: SkillMetadata,

    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Skill identity and metadata from the `[skill]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Declared capabilities from `[capabilities]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencySpec>,
}

impl SkillManifest {
    /// Load and parse a `skill.toml` file from the given path.
    pub fn from_path(path: &Path) -> SutrasResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SutrasError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content)
    }

    /// Parse a `skill.toml` from a string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> SutrasResult<Self> {
        toml::from_str(content).map_err(|e| SutrasError::Manifest {
            message: format!("Failed to parse {MANIFEST_FILE}: {e}"),
        })
    }

    /// Check the skill name and every dependency declaration.
    ///
    /// Version strings are checked by the resolver's version model, which
    /// callers run separately.
    pub fn validate(&self) -> SutrasResult<()> {
        SkillName::parse(&self.skill.name)?;
        for request in self.dependency_requests()? {
            SkillName::parse(&request.name)?;
        }
        Ok(())
    }

    /// Parsed skill name.
    pub fn skill_name(&self) -> SutrasResult<SkillName> {
        SkillName::parse(&self.skill.name)
    }

    /// The root requests this manifest contributes to a resolution.
    pub fn dependency_requests(&self) -> SutrasResult<Vec<DependencyRequest>> {
        dependency::parse_dependencies(&self.capabilities.dependencies, ROOT_SOURCE)
    }
}
