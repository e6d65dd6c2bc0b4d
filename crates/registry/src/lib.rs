//! Registry: named virtual axis and button cells, conflict detection, frame edges.
//!
//! # Invariants
//! - A name maps to at most one cell per namespace; the first registrant wins.
//! - The always-virtual set only grows, except on [`Registry::reset`].
//! - Button edge flags live for exactly one frame.

pub mod cells;
pub mod registry;

pub use cells::{AxisRef, ButtonRef, VirtualAxis, VirtualButton};
pub use registry::{Registry, RegistryError, RegistryEvent};
