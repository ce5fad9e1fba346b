//! Handler for `sutras resolve`.

use miette::Result;
use sutras_core::config::GlobalConfig;
use sutras_ops::ops_resolve::{self, ResolveOptions};

pub fn exec(json: bool, no_lock: bool) -> Result<()> {
    let project_root = super::project_root()?;
    let config = GlobalConfig::load()?;
    ops_resolve::resolve(&project_root, &config, &ResolveOptions { json, no_lock })
}
