use crate::constants::{DESERIALIZE_PATH, DESERIALIZE_URL};
use crate::kinds::TypeKind;
use serde::{Deserialize, Serialize};

/// The capability an entry implements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraitRef {
    /// Fully-qualified path, e.g. `serde::de::Deserialize`.
    pub path: String,
    /// External documentation page of the trait, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl TraitRef {
    pub fn new(path: impl Into<String>, url: Option<String>) -> Self {
        Self { path: path.into(), url }
    }

    /// Last path segment, e.g. `Deserialize`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.rsplit("::").next().unwrap_or(&self.path)
    }

    /// Path segments before the trait name, e.g. `["serde", "de"]`.
    #[must_use]
    pub fn parent_segments(&self) -> Vec<&str> {
        let mut segments: Vec<&str> = self.path.split("::").collect();
        segments.pop();
        segments
    }
}

impl Default for TraitRef {
    fn default() -> Self {
        Self { path: DESERIALIZE_PATH.to_owned(), url: Some(DESERIALIZE_URL.to_owned()) }
    }
}

/// How the implementation was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImplOrigin {
    /// `#[derive(Deserialize)]`, possibly behind `cfg_attr`.
    Derive,
    /// A hand-written `impl Deserialize<'de> for ...` block.
    Manual,
}

/// One documented type shown as implementing the indexed trait.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImplementorEntry {
    /// Simple type name, e.g. `StarknetConfig`.
    pub name: String,
    /// Fully-qualified path, e.g. `mc_data_availability::starknet::config::StarknetConfig`.
    pub path: String,
    pub kind: TypeKind,
    /// Documentation page of the type.
    pub url: String,
    pub trait_ref: TraitRef,
    /// Generic bound text, e.g. `T: Config`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bound: Option<String>,
    /// Generic parameter names of the type, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub generics: Vec<String>,
    pub origin: ImplOrigin,
    #[serde(default)]
    pub synthetic: bool,
}

impl ImplementorEntry {
    /// Identity of an entry inside its namespace.
    #[must_use]
    pub fn key(&self) -> (&str, &str, Option<&str>) {
        (&self.path, &self.trait_ref.path, self.bound.as_deref())
    }

    /// Name non-empty, URL pointing at an `.html` page with no empty path segments.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        if self.name.trim().is_empty() || self.path.trim().is_empty() {
            return false;
        }
        let Some(page) = self.url.strip_suffix(".html") else {
            return false;
        };
        let local = page.split_once("://").map_or(page, |(_, rest)| rest);
        !local.is_empty() && local.split('/').all(|segment| !segment.is_empty())
    }

    /// Type name with its generic parameters, e.g. `Wrapper<T>`.
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.generics.is_empty() {
            self.name.clone()
        } else {
            format!("{}<{}>", self.name, self.generics.join(", "))
        }
    }
}
