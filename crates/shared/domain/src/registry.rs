//! Namespace-to-implementors mapping produced by one documentation build.

use crate::entry::ImplementorEntry;
use crate::namespace::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ordered mapping from [`Namespace`] to the entries discovered in it.
///
/// Namespaces iterate in sorted order; entries keep insertion (discovery) order.
/// An entry whose `(path, trait, bound)` key already exists in the namespace is
/// not inserted again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    namespaces: BTreeMap<Namespace, Vec<ImplementorEntry>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `entry` under `namespace`. Returns `false` for a duplicate.
    pub fn insert(&mut self, namespace: Namespace, entry: ImplementorEntry) -> bool {
        let entries = self.namespaces.entry(namespace).or_default();
        if entries.iter().any(|existing| existing.key() == entry.key()) {
            return false;
        }
        entries.push(entry);
        true
    }

    #[must_use]
    pub fn get(&self, namespace: &Namespace) -> Option<&[ImplementorEntry]> {
        self.namespaces.get(namespace).map(Vec::as_slice)
    }

    /// Looks a namespace up by its text.
    #[must_use]
    pub fn get_str(&self, namespace: &str) -> Option<&[ImplementorEntry]> {
        Namespace::try_from(namespace).ok().and_then(|ns| self.get(&ns))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Namespace, &[ImplementorEntry])> {
        self.namespaces.iter().map(|(ns, entries)| (ns, entries.as_slice()))
    }

    /// Number of namespaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.namespaces.values().all(Vec::is_empty)
    }

    /// Total number of entries across namespaces.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.namespaces.values().map(Vec::len).sum()
    }

    /// Finds the entry documenting the fully-qualified `path`.
    #[must_use]
    pub fn find_by_path(&self, path: &str) -> Option<(&Namespace, &ImplementorEntry)> {
        self.namespaces
            .iter()
            .find_map(|(ns, entries)| entries.iter().find(|e| e.path == path).map(|e| (ns, e)))
    }
}
