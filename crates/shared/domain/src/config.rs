use crate::constants::{DEFAULT_OUTPUT_DIR, DESERIALIZE_PATH, DESERIALIZE_URL};
use crate::entry::TraitRef;
use crate::kinds::KindSet;
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level registry build configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfigInner {
    pub source: SourceConfig,
    #[serde(rename = "trait")]
    pub target: TraitConfig,
    pub output: OutputConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(flatten, default)]
    inner: Arc<RegistryConfigInner>,
}

impl Deref for RegistryConfig {
    type Target = RegistryConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for RegistryConfig {
    fn deref_mut(&mut self) -> &mut RegistryConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// How entries are grouped into namespaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    /// One namespace per crate (rustdoc layout).
    #[default]
    Crate,
    /// One namespace per declaring module.
    Module,
}

/// Which artifacts to write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Js,
    Json,
    Both,
}

impl OutputFormat {
    #[must_use]
    pub const fn writes_js(self) -> bool {
        matches!(self, Self::Js | Self::Both)
    }

    #[must_use]
    pub const fn writes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }
}

/// Where to look for type declarations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub root: PathBuf,
    pub include_private: bool,
    pub exclude: Vec<String>,
    pub group_by: GroupBy,
    pub kinds: KindSet,
}

/// The indexed trait.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TraitConfig {
    pub path: String,
    pub url: Option<String>,
}

impl TraitConfig {
    #[must_use]
    pub fn trait_ref(&self) -> TraitRef {
        let url = self.url.clone().or_else(|| {
            (self.path == DESERIALIZE_PATH).then(|| DESERIALIZE_URL.to_owned())
        });
        TraitRef::new(self.path.clone(), url)
    }
}

/// Where and how artifacts are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub format: OutputFormat,
    /// Absolute prefix for entry URLs; empty keeps them relative to the doc root.
    pub base_url: String,
}

// --- Default ---

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            include_private: false,
            exclude: vec!["target".to_owned(), "node_modules".to_owned()],
            group_by: GroupBy::Crate,
            kinds: KindSet::ALL,
        }
    }
}

impl Default for TraitConfig {
    fn default() -> Self {
        Self { path: DESERIALIZE_PATH.to_owned(), url: None }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::Js,
            base_url: String::new(),
        }
    }
}
