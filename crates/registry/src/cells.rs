use std::cell::Cell;
use std::rc::Rc;

use crate::registry::Registry;

/// Shared handle to a registered axis. Producers push through it, the
/// registry resolves queries through it.
pub type AxisRef = Rc<VirtualAxis>;

/// Shared handle to a registered button.
pub type ButtonRef = Rc<VirtualButton>;

/// A named continuous value pushed by a producer.
///
/// The value has no enforced range. Producers clamp before pushing.
#[derive(Debug)]
pub struct VirtualAxis {
    name: String,
    value: Cell<f32>,
    match_with_input_manager: bool,
}

impl VirtualAxis {
    /// An axis that defers to hardware whenever it is not registered.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_match(name, true)
    }

    /// An axis with an explicit hardware-matching flag. Passing `false`
    /// marks the name always-virtual once registered.
    pub fn with_match(name: impl Into<String>, match_with_input_manager: bool) -> Self {
        Self {
            name: name.into(),
            value: Cell::new(0.0),
            match_with_input_manager,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn match_with_input_manager(&self) -> bool {
        self.match_with_input_manager
    }

    pub fn update(&self, value: f32) {
        tracing::trace!(axis = %self.name, value, "axis update");
        self.value.set(value);
    }

    pub fn value(&self) -> f32 {
        self.value.get()
    }

    /// Virtual axes carry no smoothing, so the raw value is the value.
    pub fn value_raw(&self) -> f32 {
        self.value.get()
    }

    /// Unregister this cell. Does nothing unless this exact cell is the one
    /// registered under its name.
    pub fn remove(self: &Rc<Self>, registry: &mut Registry) -> bool {
        registry.remove_axis_cell(self)
    }
}

/// A named boolean input with press/release edges.
///
/// Edges accumulate within a frame and are cleared by
/// [`Registry::advance_frame`].
#[derive(Debug)]
pub struct VirtualButton {
    name: String,
    pressed: Cell<bool>,
    down_this_frame: Cell<bool>,
    up_this_frame: Cell<bool>,
    match_with_input_manager: bool,
}

impl VirtualButton {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_match(name, true)
    }

    pub fn with_match(name: impl Into<String>, match_with_input_manager: bool) -> Self {
        Self {
            name: name.into(),
            pressed: Cell::new(false),
            down_this_frame: Cell::new(false),
            up_this_frame: Cell::new(false),
            match_with_input_manager,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn match_with_input_manager(&self) -> bool {
        self.match_with_input_manager
    }

    /// Set the pressed state and record any transition as an edge.
    pub fn update(&self, pressed: bool) {
        let was = self.pressed.replace(pressed);
        if pressed && !was {
            self.down_this_frame.set(true);
        }
        if !pressed && was {
            self.up_this_frame.set(true);
        }
        tracing::trace!(button = %self.name, pressed, "button update");
    }

    pub fn press(&self) {
        self.update(true);
    }

    pub fn release(&self) {
        self.update(false);
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.get()
    }

    pub fn button_down(&self) -> bool {
        self.down_this_frame.get()
    }

    pub fn button_up(&self) -> bool {
        self.up_this_frame.get()
    }

    pub fn clear_edges(&self) {
        self.down_this_frame.set(false);
        self.up_this_frame.set(false);
    }

    pub fn remove(self: &Rc<Self>, registry: &mut Registry) -> bool {
        registry.remove_button_cell(self)
    }
}
