//! Shared types used by every crossinput crate.
//!
//! # Invariants
//! - Names are plain strings; axis and button namespaces are separate.
//! - Nothing here touches the registry or hardware.

pub mod names;
pub mod types;

pub use types::{InputKind, ProducerId, move_towards};
