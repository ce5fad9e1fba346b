//! Command dispatch and handler modules.

mod check;
mod fetch;
mod lock;
mod registry;
mod resolve;
mod tree;

use std::path::PathBuf;

use miette::Result;
use sutras_core::manifest::MANIFEST_FILE;
use sutras_util::errors::SutrasError;
use sutras_util::fs::find_ancestor_with;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Resolve { json, no_lock } => resolve::exec(json, no_lock),
        Command::Lock => lock::exec(),
        Command::Tree {
            depth,
            why,
            inverted,
        } => tree::exec(depth, why, inverted),
        Command::Fetch => fetch::exec(),
        Command::Check => check::exec(),
        Command::Registry { action } => registry::exec(action),
    }
}

/// The nearest directory at or above the current one containing a
/// `skill.toml`.
fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(SutrasError::Io)?;
    let root = find_ancestor_with(&cwd, MANIFEST_FILE).ok_or_else(|| SutrasError::Manifest {
        message: format!("No {MANIFEST_FILE} found in current directory or any parent"),
    })?;
    tracing::debug!("project root: {}", root.display());
    Ok(root)
}
