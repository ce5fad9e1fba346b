//! Operation: resolve and copy every skill archive into the artifact cache.

use std::path::Path;

use sutras_core::config::GlobalConfig;
use sutras_registry::cache::ArtifactCache;
use sutras_registry::LocalRegistry;
use sutras_util::errors::SutrasResult;
use sutras_util::progress::{progress_bar, status, status_warn};

use crate::ops_resolve::resolve_project;

/// Counts reported after a fetch.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    /// Archives copied from a registry.
    pub fetched: usize,
    /// Archives already present and verified in the cache.
    pub up_to_date: usize,
    /// Skills whose registry entry names no archive.
    pub skipped: usize,
}

/// Resolve the project and place each resolved skill's archive in the
/// cache directory from `config`, verifying checksums.
pub fn fetch_all(project_root: &Path, config: &GlobalConfig) -> SutrasResult<FetchSummary> {
    let project = resolve_project(project_root, config, true)?;
    let registry = LocalRegistry::from_config(config)?;
    let cache = ArtifactCache::new(config.cache_dir());

    let mut summary = FetchSummary::default();
    let pb = progress_bar(project.resolution.len() as u64, "Fetching");
    for skill in &project.resolution.skills {
        pb.set_message(format!("Fetching {}", skill.name));
        if skill.tarball_url.is_none() {
            pb.suspend(|| {
                status_warn(
                    "Skipping",
                    &format!("{} v{} has no archive", skill.name, skill.version),
                )
            });
            summary.skipped += 1;
            pb.inc(1);
            continue;
        }

        let artifact = registry.fetch(skill, &cache)?;
        if artifact.cached {
            summary.up_to_date += 1;
        } else {
            summary.fetched += 1;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    tracing::debug!("artifact cache at {}", cache.root().display());
    Ok(summary)
}

/// Fetch all dependencies of the project into the artifact cache.
pub fn fetch(project_root: &Path, config: &GlobalConfig) -> miette::Result<()> {
    let summary = fetch_all(project_root, config)?;
    status(
        "Fetched",
        &format!(
            "{} skills ({} up to date)",
            summary.fetched, summary.up_to_date
        ),
    );
    Ok(())
}
