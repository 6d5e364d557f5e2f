//! Shared types for the BSL syntax tree crates.
//!
//! Module assembly never aborts on a structural problem: every violation is
//! recorded in a [`Diagnostics`] collector owned by the caller, and the
//! offending item is dropped.

pub mod error;

pub use error::{AssemblyError, Diagnostics};
