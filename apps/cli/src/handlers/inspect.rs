use crate::args::InspectArgs;
use crate::handlers::resolve_config;
use anyhow::{Context, Result};
use dreg::domain::registry::Registry;
use dreg::handoff::Handoff;
use dreg::implementors::{RegistryBuilder, publish};
use std::fmt::Write;

/// Builds the registry and prints it through a console front-end.
///
/// The renderer subscribes to the handoff before the build starts and prints
/// whatever the builder publishes.
///
/// # Errors
/// Returns an error if the build fails or the registry never reaches the renderer.
pub async fn run(args: &InspectArgs) -> Result<()> {
    let config = resolve_config(&args.source)?;
    let handoff = Handoff::<Registry>::new();

    let receiver = handoff.subscribe().context("Renderer could not subscribe")?;
    let filter = args.namespace.clone();
    let renderer = tokio::spawn(async move {
        let registry = receiver.recv().await?;
        Ok::<_, dreg::handoff::HandoffError>(render_table(&registry, filter.as_deref()))
    });

    let registry = RegistryBuilder::from_config(&config)
        .build()
        .with_context(|| format!("Failed to build registry from {}", config.source.root.display()))?;
    publish(&handoff, registry).context("Failed to hand the registry to the renderer")?;

    let table = renderer.await.context("Renderer task failed")??;
    print!("{table}");
    Ok(())
}

/// Formats the registry as a plain-text table, optionally limited to one namespace.
#[must_use]
pub fn render_table(registry: &Registry, namespace: Option<&str>) -> String {
    let mut out = String::new();
    let mut shown = 0_usize;

    for (ns, entries) in registry.iter().filter(|(ns, _)| namespace.is_none_or(|wanted| ns.as_str() == wanted)) {
        let _ = writeln!(out, "\n{ns}:\n");
        let _ = writeln!(out, "{:<32} {:<8} {:<10} {:<50}", "Type", "Kind", "Origin", "Page");
        let _ = writeln!(out, "{:-<100}", "");
        for entry in entries {
            let origin = format!("{:?}", entry.origin).to_lowercase();
            let _ = writeln!(out, "{:<32} {:<8} {:<10} {:<50}", entry.display_name(), entry.kind, origin, entry.url);
            if let Some(bound) = &entry.bound {
                let _ = writeln!(out, "{:<32} where {bound}", "");
            }
        }
        shown += entries.len();
    }

    if shown == 0 {
        out.push_str("No implementors found.\n");
    } else {
        let _ = writeln!(out, "\n{shown} implementors");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dreg::domain::entry::{ImplOrigin, ImplementorEntry, TraitRef};
    use dreg::domain::kinds::TypeKind;
    use dreg::domain::namespace::Namespace;

    fn registry() -> Registry {
        let mut registry = Registry::new();
        for (ns, name, kind) in [("alpha", "StructA", TypeKind::Struct), ("beta", "DaMode", TypeKind::Enum)] {
            registry.insert(
                Namespace::try_from(ns).expect("namespace"),
                ImplementorEntry {
                    name: name.to_owned(),
                    path: format!("{ns}::{name}"),
                    kind,
                    url: format!("{ns}/{kind}.{name}.html"),
                    trait_ref: TraitRef::default(),
                    bound: None,
                    generics: Vec::new(),
                    origin: ImplOrigin::Derive,
                    synthetic: false,
                },
            );
        }
        registry
    }

    #[test]
    fn table_lists_every_namespace() {
        let table = render_table(&registry(), None);
        assert!(table.contains("alpha:"));
        assert!(table.contains("beta/enum.DaMode.html"));
        assert!(table.contains("2 implementors"));
    }

    #[test]
    fn table_filters_by_namespace() {
        let table = render_table(&registry(), Some("beta"));
        assert!(!table.contains("StructA"));
        assert!(table.contains("DaMode"));
    }

    #[test]
    fn empty_table_says_so() {
        assert_eq!(render_table(&Registry::new(), None), "No implementors found.\n");
    }
}
