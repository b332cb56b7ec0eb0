use crate::args::BuildArgs;
use crate::handlers::resolve_config;
use anyhow::{Context, Result};
use dreg::implementors::{RegistryBuilder, emit};
use tracing::info;

/// Builds the registry and writes its artifacts.
///
/// # Errors
/// Returns an error if the config cannot be loaded, the tree cannot be scanned,
/// or an artifact cannot be written.
pub fn run(args: &BuildArgs) -> Result<()> {
    let mut config = resolve_config(&args.source)?;
    if let Some(out) = &args.out {
        config.output.dir.clone_from(out);
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }

    let registry = RegistryBuilder::from_config(&config)
        .build()
        .with_context(|| format!("Failed to build registry from {}", config.source.root.display()))?;

    let written = emit(&registry, &config.target.trait_ref(), &config.output.dir, config.output.format)
        .context("Failed to write artifacts")?;
    info!(files = written.len(), "Build finished");

    println!(
        "Indexed {} implementors in {} namespaces",
        registry.entry_count(),
        registry.len()
    );
    for path in written {
        println!("  wrote {}", path.display());
    }
    Ok(())
}
