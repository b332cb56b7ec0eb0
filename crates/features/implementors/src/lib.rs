//! # Implementors
//!
//! Builds the registry behind rustdoc's "Implementors" section for a
//! deserialization trait: which types, grouped by crate or module, implement
//! it and where their documentation pages live.
//!
//! ## Pipeline
//!
//! 1. [`discover_crates`] finds packages under a root directory.
//! 2. [`scan_crate`] parses each module tree and records declarations, derives
//!    and manual impls.
//! 3. [`assemble`] resolves impls, filters, deduplicates and groups into a
//!    [`Registry`].
//! 4. [`render_js`] / [`render_json`] produce the artifacts, [`emit`] writes them,
//!    and [`publish`] hands the registry to a front-end through a
//!    [`Handoff`](dreg_handoff::Handoff).
//!
//! [`RegistryBuilder`] runs steps 1 to 3.
//!
//! # Example
//!
//! ```rust,no_run
//! use dreg_domain::config::OutputFormat;
//! use dreg_domain::entry::TraitRef;
//! use dreg_implementors::{RegistryBuilder, RegistryError, emit};
//! use std::path::Path;
//!
//! fn main() -> Result<(), RegistryError> {
//!     let registry = RegistryBuilder::new().root(".").build()?;
//!     emit(&registry, &TraitRef::default(), Path::new("target/doc"), OutputFormat::Both)?;
//!     Ok(())
//! }
//! ```

mod builder;
mod discovery;
mod emit;
mod error;
mod publish;
mod render;
mod scanner;
mod url;

pub use builder::{BuildSettings, CrateScan, NoRoot, RegistryBuilder, WithRoot, assemble, scan_crate};
pub use discovery::{CrateSource, SourceFile, discover_crates};
pub use dreg_domain::registry::Registry;
pub use emit::emit;
pub use error::{RegistryError, RegistryErrorExt};
pub use publish::publish;
pub use render::{impl_text, render_js, render_json};
pub use scanner::{Declaration, Finding, ManualImpl, ModDecl, ScannedFile, TraitMatcher, scan_source};
pub use url::{doc_url, implementors_file, type_path};
