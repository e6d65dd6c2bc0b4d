//! Axis and button names that gameplay consumers rely on.
//!
//! These are a naming contract only. Nothing checks that a producer or a
//! hardware binding exists for them.

pub const HORIZONTAL: &str = "Horizontal";
pub const VERTICAL: &str = "Vertical";
pub const JUMP: &str = "Jump";
pub const MOUSE_X: &str = "Mouse X";
pub const MOUSE_Y: &str = "Mouse Y";
