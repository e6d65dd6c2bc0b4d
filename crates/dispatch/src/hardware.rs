use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::Vec3;

/// The platform's native input service, queried by name.
///
/// Every query returns `None` when the platform has no binding for the
/// name, which lets the dispatcher report unresolved names instead of
/// guessing a default.
pub trait HardwareInput {
    /// Current axis value. `raw` asks for the unsmoothed value when the
    /// platform distinguishes the two.
    fn axis(&self, name: &str, raw: bool) -> Option<f32>;

    fn button(&self, name: &str) -> Option<bool>;

    fn button_down(&self, name: &str) -> Option<bool>;

    fn button_up(&self, name: &str) -> Option<bool>;

    fn mouse_position(&self) -> Vec3;

    /// Called once per frame after consumers have read input.
    fn end_frame(&self) {}
}

/// Hardware service with no bindings at all. Used on touch-only targets
/// and in isolated tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHardware;

impl HardwareInput for NullHardware {
    fn axis(&self, _name: &str, _raw: bool) -> Option<f32> {
        None
    }

    fn button(&self, _name: &str) -> Option<bool> {
        None
    }

    fn button_down(&self, _name: &str) -> Option<bool> {
        None
    }

    fn button_up(&self, _name: &str) -> Option<bool> {
        None
    }

    fn mouse_position(&self) -> Vec3 {
        Vec3::ZERO
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisBinding {
    value: f32,
    raw: f32,
}

#[derive(Debug, Clone, Copy, Default)]
struct ButtonBinding {
    pressed: bool,
    down: bool,
    up: bool,
}

#[derive(Debug, Default)]
struct Bindings {
    axes: HashMap<String, AxisBinding>,
    buttons: HashMap<String, ButtonBinding>,
    mouse: Vec3,
}

/// A programmable hardware table.
///
/// Clones share one table, so a driver can keep a handle and change
/// bindings after the dispatcher has taken its own copy.
#[derive(Debug, Default, Clone)]
pub struct BoundHardware {
    inner: Rc<RefCell<Bindings>>,
}

impl BoundHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an axis whose smoothed and raw values are the same.
    pub fn bind_axis(&self, name: impl Into<String>, value: f32) {
        self.bind_axis_split(name, value, value);
    }

    pub fn bind_axis_split(&self, name: impl Into<String>, value: f32, raw: f32) {
        self.inner
            .borrow_mut()
            .axes
            .insert(name.into(), AxisBinding { value, raw });
    }

    /// Bind a button in the released state.
    pub fn bind_button(&self, name: impl Into<String>) {
        self.inner
            .borrow_mut()
            .buttons
            .entry(name.into())
            .or_default();
    }

    /// Press a button, binding it first if needed.
    pub fn press_button(&self, name: impl Into<String>) {
        let mut inner = self.inner.borrow_mut();
        let button = inner.buttons.entry(name.into()).or_default();
        if !button.pressed {
            button.down = true;
        }
        button.pressed = true;
    }

    pub fn release_button(&self, name: impl Into<String>) {
        let mut inner = self.inner.borrow_mut();
        let button = inner.buttons.entry(name.into()).or_default();
        if button.pressed {
            button.up = true;
        }
        button.pressed = false;
    }

    pub fn set_mouse_position(&self, position: Vec3) {
        self.inner.borrow_mut().mouse = position;
    }

    fn button_state(&self, name: &str) -> Option<ButtonBinding> {
        self.inner.borrow().buttons.get(name).copied()
    }
}

impl HardwareInput for BoundHardware {
    fn axis(&self, name: &str, raw: bool) -> Option<f32> {
        self.inner
            .borrow()
            .axes
            .get(name)
            .map(|a| if raw { a.raw } else { a.value })
    }

    fn button(&self, name: &str) -> Option<bool> {
        self.button_state(name).map(|b| b.pressed)
    }

    fn button_down(&self, name: &str) -> Option<bool> {
        self.button_state(name).map(|b| b.down)
    }

    fn button_up(&self, name: &str) -> Option<bool> {
        self.button_state(name).map(|b| b.up)
    }

    fn mouse_position(&self) -> Vec3 {
        self.inner.borrow().mouse
    }

    fn end_frame(&self) {
        for button in self.inner.borrow_mut().buttons.values_mut() {
            button.down = false;
            button.up = false;
        }
    }
}
