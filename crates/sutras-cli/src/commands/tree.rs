//! Handler for `sutras tree`.

use miette::Result;
use sutras_core::config::GlobalConfig;
use sutras_ops::ops_tree::{self, TreeOptions};

pub fn exec(depth: Option<usize>, why: Option<String>, inverted: Option<String>) -> Result<()> {
    let project_root = super::project_root()?;
    let config = GlobalConfig::load()?;
    let opts = TreeOptions {
        depth,
        why,
        inverted,
    };
    ops_tree::tree(&project_root, &config, &opts)
}
