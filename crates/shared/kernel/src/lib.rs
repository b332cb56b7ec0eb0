//! Kernel utilities shared across slices.
//! Keep this crate lightweight: it hosts layered configuration loading.
//!
//! ## Config loading
//! ```rust,no_run
//! use dreg_kernel::config::load_registry_config;
//!
//! let cfg = load_registry_config(Some("dreg.toml")).unwrap();
//! println!("{}", cfg.output.dir.display());
//! ```

pub mod config;

pub use dreg_domain as domain;
