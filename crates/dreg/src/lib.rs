//! Facade crate for the `dreg` implementors registry toolkit.
//! Re-exports domain/kernel primitives and the registry builder.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load a [`domain::config::RegistryConfig`] with [`kernel::config::load_registry_config`].
//! - Run [`implementors::RegistryBuilder::from_config`], then `emit` or `publish`.

pub use dreg_domain as domain;
pub use dreg_handoff as handoff;
pub use dreg_implementors as implementors;
pub use dreg_kernel as kernel;
pub use dreg_logger as logger;

/// Build-time enabled features (by Cargo feature).
pub mod features {
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "json-logs")]
        "json-logs",
    ];
}

/// Commonly used types in one import.
pub mod prelude {
    pub use dreg_domain::config::{GroupBy, OutputFormat, RegistryConfig};
    pub use dreg_domain::entry::{ImplOrigin, ImplementorEntry, TraitRef};
    pub use dreg_domain::kinds::{KindSet, TypeKind};
    pub use dreg_domain::namespace::Namespace;
    pub use dreg_domain::registry::Registry;
    pub use dreg_handoff::{Delivery, Handoff, HandoffError, SlotState};
    pub use dreg_implementors::{RegistryBuilder, RegistryError, emit, publish, render_js, render_json};
}
