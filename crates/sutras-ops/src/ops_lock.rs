//! Operation: resolve all dependencies and regenerate `sutras.lock`.

use std::path::Path;

use sutras_core::config::GlobalConfig;
use sutras_core::lockfile::{Lockfile, LOCKFILE_NAME};
use sutras_util::errors::SutrasResult;

use crate::ops_resolve::resolve_project;

/// Resolve from scratch, ignoring any existing lockfile, and write the
/// result to `sutras.lock`.
pub fn write_lockfile(project_root: &Path, config: &GlobalConfig) -> SutrasResult<Lockfile> {
    let project = resolve_project(project_root, config, false)?;
    let lockfile = project.resolution.to_lockfile();
    lockfile.write_to(&project_root.join(LOCKFILE_NAME))?;
    tracing::debug!("wrote {} entries to {LOCKFILE_NAME}", lockfile.skill.len());
    Ok(lockfile)
}

/// Force re-resolve all dependencies and regenerate `sutras.lock`.
pub fn lock(project_root: &Path, config: &GlobalConfig) -> miette::Result<()> {
    let sp = sutras_util::progress::spinner("Resolving dependencies...");
    let result = write_lockfile(project_root, config);
    sp.finish_and_clear();
    let lockfile = result?;

    sutras_util::progress::status(
        "Locked",
        &format!("{} skills in {LOCKFILE_NAME}", lockfile.skill.len()),
    );
    Ok(())
}
