//! Dependency declarations and their normalization into resolver requests.

use serde::{Deserialize, Serialize};

use sutras_util::errors::{SutrasError, SutrasResult};

/// Constraint applied when a declaration does not name one.
pub const ANY_VERSION: &str = "*";

/// Source label used for requests that come from the project manifest itself.
pub const ROOT_SOURCE: &str = "root";

/// A dependency declaration as written in a manifest or registry index.
///
/// Supports both shorthand (`"@acme/text-utils"`) and detailed
/// (`{ name = "...", version = "^1.0.0", optional = true }`) forms, freely
/// mixed within one list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Bare(String),
    Detailed(DetailedDependency),
}

/// A dependency with an explicit constraint and flags.
///
/// `name` is optional at the serde level so a missing name surfaces as
/// [`SutrasError::InvalidManifest`] citing the entry, not as an opaque
/// deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailedDependency {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
}

/// One edge "`source` requires `name` at `constraint`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    pub name: String,
    pub constraint: String,
    pub source: String,
    pub registry: Option<String>,
    pub optional: bool,
}

impl DependencyRequest {
    /// A required request with no registry hint.
    pub fn new(
        name: impl Into<String>,
        constraint: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
            source: source.into(),
            registry: None,
            optional: false,
        }
    }

    pub fn with_registry(mut self, registry: impl Into<String>) -> Self {
        self.registry = Some(registry.into());
        self
    }

    pub fn optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }
}

impl DependencySpec {
    /// Normalize this declaration into a request made by `source`.
    pub fn to_request(&self, source: &str) -> SutrasResult<DependencyRequest> {
        match self {
            DependencySpec::Bare(name) => {
                if name.trim().is_empty() {
                    return Err(SutrasError::InvalidManifest {
                        entry: render_entry(self),
                    });
                }
                Ok(DependencyRequest::new(name.trim(), ANY_VERSION, source))
            }
            DependencySpec::Detailed(d) => {
                let name = d
                    .name
                    .as_deref()
                    .map(str::trim)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| SutrasError::InvalidManifest {
                        entry: render_entry(self),
                    })?;
                Ok(DependencyRequest {
                    name: name.to_string(),
                    constraint: d
                        .version
                        .clone()
                        .unwrap_or_else(|| ANY_VERSION.to_string()),
                    source: source.to_string(),
                    registry: d.registry.clone(),
                    optional: d.optional,
                })
            }
        }
    }
}

/// Normalize a manifest's dependency list into uniform requests, preserving order.
pub fn parse_dependencies(
    entries: &[DependencySpec],
    source: &str,
) -> SutrasResult<Vec<DependencyRequest>> {
    entries.iter().map(|entry| entry.to_request(source)).collect()
}

fn render_entry(entry: &DependencySpec) -> String {
    serde_json::to_string(entry).unwrap_or_else(|_| format!("{entry:?}"))
}
