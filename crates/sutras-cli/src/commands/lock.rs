//! Handler for `sutras lock`.

use miette::Result;
use sutras_core::config::GlobalConfig;

pub fn exec() -> Result<()> {
    let project_root = super::project_root()?;
    let config = GlobalConfig::load()?;
    sutras_ops::ops_lock::lock(&project_root, &config)
}
