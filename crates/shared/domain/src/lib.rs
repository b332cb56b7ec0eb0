//! # Domain Models
//!
//! Pure data types of the implementors registry with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O or heavy logic, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod entry;
pub mod kinds;
pub mod namespace;
pub mod registry;
