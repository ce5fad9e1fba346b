use serde::{Deserialize, Serialize};
use std::path::Path;

use sutras_util::errors::{SutrasError, SutrasResult};

/// File name of the lockfile next to `skill.toml`.
pub const LOCKFILE_NAME: &str = "sutras.lock";

/// Lockfile format version written by this release.
pub const LOCKFILE_VERSION: u32 = 1;

/// Deterministic lockfile recording the exact resolved skill versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub skill: Vec<LockedSkill>,
}

/// A single locked skill with its resolved version and artifact metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedSkill {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tarball_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_version() -> u32 {
    LOCKFILE_VERSION
}

impl Default for Lockfile {
    fn default() -> Self {
        Self {
            version: LOCKFILE_VERSION,
            skill: Vec::new(),
        }
    }
}

impl Lockfile {
    /// Build a lockfile from resolved entries, sorted by name for stable diffs.
    pub fn generate(mut skills: Vec<LockedSkill>) -> Self {
        skills.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            version: LOCKFILE_VERSION,
            skill: skills,
        }
    }

    /// Load and parse a `sutras.lock` file from the given path.
    pub fn from_path(path: &Path) -> SutrasResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| SutrasError::Lockfile {
            message: format!("Failed to read lockfile: {e}"),
        })?;
        let lockfile: Self = toml::from_str(&content).map_err(|e| SutrasError::Lockfile {
            message: format!("Failed to parse lockfile: {e}"),
        })?;
        if lockfile.version > LOCKFILE_VERSION {
            return Err(SutrasError::Lockfile {
                message: format!(
                    "Lockfile version {} is newer than supported version {LOCKFILE_VERSION}",
                    lockfile.version
                ),
            });
        }
        Ok(lockfile)
    }

    /// Load the lockfile if it exists, `None` otherwise.
    pub fn load_if_present(path: &Path) -> SutrasResult<Option<Self>> {
        if path.is_file() {
            Self::from_path(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Serialize the lockfile to a pretty-printed TOML string.
    pub fn to_string_pretty(&self) -> SutrasResult<String> {
        toml::to_string_pretty(self).map_err(|e| SutrasError::Lockfile {
            message: format!("Failed to serialize lockfile: {e}"),
        })
    }

    /// Atomically write the lockfile to `path`.
    pub fn write_to(&self, path: &Path) -> SutrasResult<()> {
        let content = self.to_string_pretty()?;
        sutras_util::fs::write_atomic(path, content.as_bytes()).map_err(|e| {
            SutrasError::Lockfile {
                message: format!("Failed to write {}: {e}", path.display()),
            }
        })
    }

    /// The locked entry for `name`, if any.
    pub fn find(&self, name: &str) -> Option<&LockedSkill> {
        self.skill.iter().find(|s| s.name == name)
    }

    /// The locked version string for `name`, if any.
    pub fn locked_version(&self, name: &str) -> Option<&str> {
        self.find(name).map(|s| s.version.as_str())
    }
}
