//! Handler for `sutras fetch`.

use miette::Result;
use sutras_core::config::GlobalConfig;

pub fn exec() -> Result<()> {
    let project_root = super::project_root()?;
    let config = GlobalConfig::load()?;
    sutras_ops::ops_fetch::fetch(&project_root, &config)
}
