//! Operation: validate `skill.toml` without touching any registry.

use std::collections::HashSet;
use std::path::Path;

use sutras_core::manifest::SkillManifest;
use sutras_resolver::{parse_constraint, parse_version};
use sutras_util::errors::{SutrasError, SutrasResult};

use crate::ops_resolve::load_manifest;

/// What a successful check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub name: String,
    pub version: String,
    pub dependencies: usize,
}

/// Validate the skill name, its version, and every dependency declaration
/// and constraint.
pub fn check_manifest(manifest: &SkillManifest) -> SutrasResult<CheckReport> {
    manifest.validate()?;
    let version = parse_version(&manifest.skill.version)?;

    let requests = manifest.dependency_requests()?;
    let mut seen = HashSet::new();
    for request in &requests {
        if !seen.insert(request.name.as_str()) {
            return Err(SutrasError::Manifest {
                message: format!("Dependency '{}' is declared more than once", request.name),
            });
        }
        parse_constraint(&request.constraint)?;
    }

    Ok(CheckReport {
        name: manifest.skill.name.clone(),
        version: version.to_string(),
        dependencies: requests.len(),
    })
}

/// Check the project's `skill.toml`.
pub fn check(project_root: &Path) -> miette::Result<()> {
    let manifest = load_manifest(project_root)?;
    let report = check_manifest(&manifest)?;
    sutras_util::progress::status(
        "Checked",
        &format!(
            "{} v{} ({} dependencies)",
            report.name, report.version, report.dependencies
        ),
    );
    Ok(())
}
