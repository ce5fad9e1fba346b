//! Handler for `sutras check`.

use miette::Result;

pub fn exec() -> Result<()> {
    let project_root = super::project_root()?;
    sutras_ops::ops_check::check(&project_root)
}
