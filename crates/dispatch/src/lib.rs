//! Dispatch: the one query surface every gameplay consumer reads input from.
//!
//! # Invariants
//! - A registered or always-virtual name never reaches the hardware service.
//! - Any other name is answered by hardware unchanged, or reported unresolved.
//! - The backend is chosen once, at construction or by an explicit switch.

pub mod backend;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod hardware;

pub use backend::{HardwareBackend, InputBackend, SimulatedBackend};
pub use config::{ConfigError, InputConfig, InputMethod, Platform};
pub use dispatcher::CrossPlatformInput;
pub use error::DispatchError;
pub use hardware::{BoundHardware, HardwareInput, NullHardware};
