use crate::error::{RegistryError, RegistryErrorExt};
use dreg_domain::registry::Registry;
use dreg_handoff::{Delivery, Handoff};
use std::sync::Arc;
use tracing::info;

/// Hands a finished registry to whichever front-end consumes `handoff`.
///
/// A consumer that registered earlier receives it immediately; otherwise the
/// registry waits in the pending slot.
///
/// # Errors
/// Returns [`RegistryError::Handoff`] if a registry was already published into
/// this handoff.
pub fn publish(handoff: &Handoff<Registry>, registry: impl Into<Arc<Registry>>) -> Result<Delivery, RegistryError> {
    let registry = registry.into();
    let (namespaces, entries) = (registry.len(), registry.entry_count());

    let delivery = handoff.publish_arc(registry).context("Publishing implementors registry")?;
    info!(namespaces, entries, delivery = ?delivery, "Implementors registry published");
    Ok(delivery)
}
