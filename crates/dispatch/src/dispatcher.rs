use std::rc::Rc;

use crossinput_registry::Registry;
use glam::Vec3;

use crate::backend::{HardwareBackend, InputBackend, SimulatedBackend};
use crate::config::{InputConfig, InputMethod};
use crate::error::DispatchError;
use crate::hardware::{HardwareInput, NullHardware};

/// The uniform input facade.
///
/// Owns the [`Registry`] and the active backend. Producers reach the
/// registry through [`registry_mut`](Self::registry_mut); consumers only
/// call the `get_*` queries, once per frame, then [`end_frame`](Self::end_frame).
pub struct CrossPlatformInput {
    registry: Registry,
    backend: Box<dyn InputBackend>,
    hardware: Rc<dyn HardwareInput>,
}

impl CrossPlatformInput {
    /// Build the facade with an empty registry. The backend is selected
    /// here, once, from the config.
    pub fn new(config: &InputConfig, hardware: Rc<dyn HardwareInput>) -> Self {
        let method = config.resolved_method();
        tracing::info!(?method, "input dispatch initialised");
        Self {
            registry: Registry::new(),
            backend: make_backend(method, hardware.clone()),
            hardware,
        }
    }

    /// Hardware-merged dispatch using the given service.
    pub fn with_hardware(hardware: Rc<dyn HardwareInput>) -> Self {
        Self::new(&InputConfig::with_method(InputMethod::Hardware), hardware)
    }

    /// Virtual-only dispatch with no hardware behind it.
    pub fn simulated() -> Self {
        Self::new(
            &InputConfig::with_method(InputMethod::Touch),
            Rc::new(NullHardware),
        )
    }

    pub fn active_method(&self) -> InputMethod {
        self.backend.method()
    }

    /// Replace the backend. Registered cells are kept.
    pub fn switch_active_input_method(&mut self, method: InputMethod) {
        if self.backend.method() == method {
            return;
        }
        tracing::info!(?method, "switching active input method");
        self.backend = make_backend(method, self.hardware.clone());
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn axis_exists(&self, name: &str) -> bool {
        self.registry.axis_exists(name)
    }

    pub fn button_exists(&self, name: &str) -> bool {
        self.registry.button_exists(name)
    }

    /// Smoothed axis value.
    pub fn get_axis(&self, name: &str) -> Result<f32, DispatchError> {
        self.get_axis_with(name, false)
    }

    pub fn get_axis_raw(&self, name: &str) -> Result<f32, DispatchError> {
        self.get_axis_with(name, true)
    }

    pub fn get_axis_with(&self, name: &str, raw: bool) -> Result<f32, DispatchError> {
        self.backend.get_axis(&self.registry, name, raw)
    }

    pub fn get_button(&self, name: &str) -> Result<bool, DispatchError> {
        self.backend.get_button(&self.registry, name)
    }

    pub fn get_button_down(&self, name: &str) -> Result<bool, DispatchError> {
        self.backend.get_button_down(&self.registry, name)
    }

    pub fn get_button_up(&self, name: &str) -> Result<bool, DispatchError> {
        self.backend.get_button_up(&self.registry, name)
    }

    pub fn mouse_position(&self) -> Vec3 {
        self.backend.mouse_position(&self.registry)
    }

    pub fn set_virtual_mouse_position_x(&mut self, x: f32) {
        self.registry.set_virtual_mouse_position_x(x);
    }

    pub fn set_virtual_mouse_position_y(&mut self, y: f32) {
        self.registry.set_virtual_mouse_position_y(y);
    }

    pub fn set_virtual_mouse_position_z(&mut self, z: f32) {
        self.registry.set_virtual_mouse_position_z(z);
    }

    pub fn set_axis(&mut self, name: &str, value: f32) -> Result<(), DispatchError> {
        self.backend.set_axis(&mut self.registry, name, value)
    }

    pub fn set_axis_positive(&mut self, name: &str) -> Result<(), DispatchError> {
        self.set_axis(name, 1.0)
    }

    pub fn set_axis_negative(&mut self, name: &str) -> Result<(), DispatchError> {
        self.set_axis(name, -1.0)
    }

    pub fn set_axis_zero(&mut self, name: &str) -> Result<(), DispatchError> {
        self.set_axis(name, 0.0)
    }

    pub fn set_button_down(&mut self, name: &str) -> Result<(), DispatchError> {
        self.backend.set_button_down(&mut self.registry, name)
    }

    pub fn set_button_up(&mut self, name: &str) -> Result<(), DispatchError> {
        self.backend.set_button_up(&mut self.registry, name)
    }

    /// Close the frame: button edges from this frame stop reporting.
    pub fn end_frame(&mut self) {
        self.registry.advance_frame();
        self.backend.end_frame();
    }

    /// Drop every virtual cell and flag. Producers still holding cells
    /// keep pushing into orphans until they are re-enabled.
    pub fn reset(&mut self) {
        self.registry.reset();
    }
}

fn make_backend(method: InputMethod, hardware: Rc<dyn HardwareInput>) -> Box<dyn InputBackend> {
    match method {
        InputMethod::Hardware => Box::new(HardwareBackend::new(hardware)),
        InputMethod::Touch => Box::new(SimulatedBackend::new()),
    }
}
