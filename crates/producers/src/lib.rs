//! Producers: touch controls that create virtual cells and push values into them.
//!
//! # Invariants
//! - Every cell a producer registers is removed when it is disabled.
//! - Producers reach the registry only through the `&mut Registry` they are handed.
//! - Axis buttons sharing an axis name share one cell; pairing is an index, not a scan.

pub mod axis_button;
pub mod button_handler;
pub mod host;
pub mod joystick;
pub mod layout;
pub mod pairing;
pub mod producer;

pub use axis_button::{AxisButtonConfig, AxisTouchButton, ButtonRole, PressState};
pub use button_handler::{ButtonHandler, ButtonHandlerConfig};
pub use host::{Control, TouchControls};
pub use joystick::{AxisOption, DragState, Joystick, JoystickConfig};
pub use layout::{ControlLayout, LayoutError};
pub use pairing::PairingIndex;
pub use producer::{ActivationReport, Producer, ProducerError};
