//! Developer tooling: read-only views of the virtual input registry.
//!
//! # Invariants
//! - Tools never mutate the registry.

pub mod inspector;

pub use inspector::{CellInfo, RegistryInspector, RegistrySummary};
