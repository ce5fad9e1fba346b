//! Handler for `sutras registry`.

use miette::Result;
use sutras_core::config::GlobalConfig;
use sutras_ops::ops_registry::{self, RegistryAddOptions};

use crate::cli::RegistryAction;

pub fn exec(action: RegistryAction) -> Result<()> {
    let config_path = GlobalConfig::default_path();
    match action {
        RegistryAction::Add {
            name,
            url,
            namespace,
            priority,
            default,
        } => ops_registry::add(
            &config_path,
            &RegistryAddOptions {
                name,
                url,
                namespace,
                priority,
                set_default: default,
            },
        ),
        RegistryAction::Remove { name } => ops_registry::remove(&config_path, &name),
        RegistryAction::List => ops_registry::list(&config_path),
    }
}
