pub mod build;
pub mod inspect;

use crate::args::SourceArgs;
use anyhow::{Context, Result};
use dreg::domain::config::RegistryConfig;
use dreg::kernel::config::load_registry_config;

/// Loads the config file (if any) and applies command-line overrides on top.
///
/// # Errors
/// Returns an error if the config file is missing or malformed.
pub fn resolve_config(args: &SourceArgs) -> Result<RegistryConfig> {
    let mut config =
        load_registry_config(args.config.as_deref()).context("Failed to load configuration")?;

    if let Some(root) = &args.root {
        config.source.root.clone_from(root);
    }
    if args.include_private {
        config.source.include_private = true;
    }
    if let Some(group_by) = args.group_by {
        config.source.group_by = group_by.into();
    }
    Ok(config)
}
