use std::rc::Rc;

use crossinput_common::InputKind;
use crossinput_registry::{Registry, VirtualAxis, VirtualButton};
use glam::Vec3;

use crate::config::InputMethod;
use crate::error::DispatchError;
use crate::hardware::HardwareInput;

/// Resolution strategy behind the dispatch facade. All backends implement
/// this trait; the facade picks one and never inspects which.
///
/// Backends own no input state. Virtual values live in the [`Registry`]
/// passed to each call.
pub trait InputBackend {
    fn method(&self) -> InputMethod;

    fn get_axis(&self, registry: &Registry, name: &str, raw: bool) -> Result<f32, DispatchError>;

    fn get_button(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError>;

    fn get_button_down(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError>;

    fn get_button_up(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError>;

    fn set_axis(
        &mut self,
        registry: &mut Registry,
        name: &str,
        value: f32,
    ) -> Result<(), DispatchError>;

    fn set_button_down(
        &mut self,
        registry: &mut Registry,
        name: &str,
    ) -> Result<(), DispatchError>;

    fn set_button_up(&mut self, registry: &mut Registry, name: &str) -> Result<(), DispatchError>;

    fn mouse_position(&self, registry: &Registry) -> Vec3;

    fn end_frame(&self) {}
}

fn virtual_axis(registry: &Registry, name: &str) -> bool {
    registry.is_always_virtual(name) || registry.axis_exists(name)
}

fn virtual_button(registry: &Registry, name: &str) -> bool {
    registry.is_always_virtual(name) || registry.button_exists(name)
}

/// Value of a virtual axis. An always-virtual name whose cell is gone
/// reads as neutral rather than leaking through to hardware.
fn axis_value(registry: &Registry, name: &str, raw: bool) -> f32 {
    registry
        .virtual_axis_reference(name)
        .map(|axis| if raw { axis.value_raw() } else { axis.value() })
        .unwrap_or(0.0)
}

fn button_state(registry: &Registry, name: &str, read: fn(&VirtualButton) -> bool) -> bool {
    registry
        .virtual_button_reference(name)
        .is_some_and(|button| read(&button))
}

fn merge_mouse(registry: &Registry, fallback: Vec3) -> Vec3 {
    let [x, y, z] = registry.virtual_mouse_position();
    Vec3::new(
        x.unwrap_or(fallback.x),
        y.unwrap_or(fallback.y),
        z.unwrap_or(fallback.z),
    )
}

/// Registered virtual cells first, the platform's hardware service for
/// everything else.
pub struct HardwareBackend {
    hardware: Rc<dyn HardwareInput>,
}

impl HardwareBackend {
    pub fn new(hardware: Rc<dyn HardwareInput>) -> Self {
        Self { hardware }
    }

    fn hardware_button(
        &self,
        registry: &Registry,
        name: &str,
        read_virtual: fn(&VirtualButton) -> bool,
        read_hardware: impl FnOnce(&dyn HardwareInput) -> Option<bool>,
    ) -> Result<bool, DispatchError> {
        if virtual_button(registry, name) {
            return Ok(button_state(registry, name, read_virtual));
        }
        read_hardware(self.hardware.as_ref())
            .ok_or_else(|| DispatchError::unresolved(InputKind::Button, name))
    }
}

impl InputBackend for HardwareBackend {
    fn method(&self) -> InputMethod {
        InputMethod::Hardware
    }

    fn get_axis(&self, registry: &Registry, name: &str, raw: bool) -> Result<f32, DispatchError> {
        if virtual_axis(registry, name) {
            return Ok(axis_value(registry, name, raw));
        }
        self.hardware
            .axis(name, raw)
            .ok_or_else(|| DispatchError::unresolved(InputKind::Axis, name))
    }

    fn get_button(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        self.hardware_button(registry, name, VirtualButton::is_pressed, |hw| {
            hw.button(name)
        })
    }

    fn get_button_down(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        self.hardware_button(registry, name, VirtualButton::button_down, |hw| {
            hw.button_down(name)
        })
    }

    fn get_button_up(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        self.hardware_button(registry, name, VirtualButton::button_up, |hw| {
            hw.button_up(name)
        })
    }

    /// Writes go to an existing virtual cell. Hardware values are
    /// read-only, so a name without a cell is an error.
    fn set_axis(
        &mut self,
        registry: &mut Registry,
        name: &str,
        value: f32,
    ) -> Result<(), DispatchError> {
        let axis = registry
            .virtual_axis_reference(name)
            .ok_or_else(|| DispatchError::not_settable(InputKind::Axis, name))?;
        axis.update(value);
        Ok(())
    }

    fn set_button_down(
        &mut self,
        registry: &mut Registry,
        name: &str,
    ) -> Result<(), DispatchError> {
        let button = registry
            .virtual_button_reference(name)
            .ok_or_else(|| DispatchError::not_settable(InputKind::Button, name))?;
        button.press();
        Ok(())
    }

    fn set_button_up(&mut self, registry: &mut Registry, name: &str) -> Result<(), DispatchError> {
        let button = registry
            .virtual_button_reference(name)
            .ok_or_else(|| DispatchError::not_settable(InputKind::Button, name))?;
        button.release();
        Ok(())
    }

    fn mouse_position(&self, registry: &Registry) -> Vec3 {
        merge_mouse(registry, self.hardware.mouse_position())
    }

    fn end_frame(&self) {
        self.hardware.end_frame();
    }
}

/// Virtual-only resolution for touch targets and scripted sessions.
///
/// Queries never reach hardware. Scripted writes create the cell on first
/// use, the way a touch control would when it appears.
#[derive(Debug, Default)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }

    fn ensure_axis(registry: &mut Registry, name: &str) -> Rc<VirtualAxis> {
        if let Some(axis) = registry.virtual_axis_reference(name) {
            return axis;
        }
        let axis = Rc::new(VirtualAxis::new(name));
        // Absence was checked above, so registration cannot conflict.
        let _ = registry.register_virtual_axis(axis.clone());
        axis
    }

    fn ensure_button(registry: &mut Registry, name: &str) -> Rc<VirtualButton> {
        if let Some(button) = registry.virtual_button_reference(name) {
            return button;
        }
        let button = Rc::new(VirtualButton::new(name));
        let _ = registry.register_virtual_button(button.clone());
        button
    }

    fn button(
        registry: &Registry,
        name: &str,
        read: fn(&VirtualButton) -> bool,
    ) -> Result<bool, DispatchError> {
        if virtual_button(registry, name) {
            Ok(button_state(registry, name, read))
        } else {
            Err(DispatchError::unresolved(InputKind::Button, name))
        }
    }
}

impl InputBackend for SimulatedBackend {
    fn method(&self) -> InputMethod {
        InputMethod::Touch
    }

    fn get_axis(&self, registry: &Registry, name: &str, raw: bool) -> Result<f32, DispatchError> {
        if virtual_axis(registry, name) {
            Ok(axis_value(registry, name, raw))
        } else {
            Err(DispatchError::unresolved(InputKind::Axis, name))
        }
    }

    fn get_button(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        Self::button(registry, name, VirtualButton::is_pressed)
    }

    fn get_button_down(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        Self::button(registry, name, VirtualButton::button_down)
    }

    fn get_button_up(&self, registry: &Registry, name: &str) -> Result<bool, DispatchError> {
        Self::button(registry, name, VirtualButton::button_up)
    }

    fn set_axis(
        &mut self,
        registry: &mut Registry,
        name: &str,
        value: f32,
    ) -> Result<(), DispatchError> {
        Self::ensure_axis(registry, name).update(value);
        Ok(())
    }

    fn set_button_down(
        &mut self,
        registry: &mut Registry,
        name: &str,
    ) -> Result<(), DispatchError> {
        Self::ensure_button(registry, name).press();
        Ok(())
    }

    fn set_button_up(&mut self, registry: &mut Registry, name: &str) -> Result<(), DispatchError> {
        Self::ensure_button(registry, name).release();
        Ok(())
    }

    fn mouse_position(&self, registry: &Registry) -> Vec3 {
        merge_mouse(registry, Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::BoundHardware;

    fn hardware() -> (BoundHardware, HardwareBackend) {
        let hw = BoundHardware::new();
        let backend = HardwareBackend::new(Rc::new(hw.clone()));
        (hw, backend)
    }

    #[test]
    fn unregistered_axis_falls_back_to_hardware() {
        let (hw, backend) = hardware();
        hw.bind_axis_split("Horizontal", 0.3, 1.0);
        let r = Registry::new();
        assert_eq!(backend.get_axis(&r, "Horizontal", false), Ok(0.3));
        assert_eq!(backend.get_axis(&r, "Horizontal", true), Ok(1.0));
    }

    #[test]
    fn unregistered_button_falls_back_to_hardware() {
        let (hw, backend) = hardware();
        let r = Registry::new();
        hw.bind_button("Fire");
        assert_eq!(backend.get_button(&r, "Fire"), Ok(false));
        assert_eq!(backend.get_button_down(&r, "Fire"), Ok(false));
        assert_eq!(backend.get_button_up(&r, "Fire"), Ok(false));

        hw.press_button("Fire");
        assert_eq!(backend.get_button(&r, "Fire"), Ok(true));
        assert_eq!(backend.get_button_down(&r, "Fire"), Ok(true));
        assert_eq!(backend.get_button_up(&r, "Fire"), Ok(false));
        backend.end_frame();

        hw.release_button("Fire");
        assert_eq!(backend.get_button(&r, "Fire"), Ok(false));
        assert_eq!(backend.get_button_down(&r, "Fire"), Ok(false));
        assert_eq!(backend.get_button_up(&r, "Fire"), Ok(true));
    }

    #[test]
    fn registered_axis_shadows_hardware() {
        let (hw, backend) = hardware();
        hw.bind_axis("Horizontal", 0.3);
        let mut r = Registry::new();
        let axis = Rc::new(VirtualAxis::new("Horizontal"));
        r.register_virtual_axis(axis.clone()).unwrap();
        axis.update(-0.7);
        assert_eq!(backend.get_axis(&r, "Horizontal", false), Ok(-0.7));
        assert_eq!(backend.get_axis(&r, "Horizontal", true), Ok(-0.7));
    }

    #[test]
    fn unknown_name_is_unresolved() {
        let (_, backend) = hardware();
        let r = Registry::new();
        assert_eq!(
            backend.get_axis(&r, "Throttle", false),
            Err(DispatchError::Unresolved {
                kind: InputKind::Axis,
                name: "Throttle".into()
            })
        );
        assert!(backend.get_button(&r, "Fire").is_err());
    }

    #[test]
    fn always_virtual_without_cell_reads_neutral() {
        let (hw, backend) = hardware();
        hw.bind_axis("Mouse X", 0.9);
        hw.press_button("Mouse X");
        let mut r = Registry::new();
        r.register_virtual_axis(Rc::new(VirtualAxis::with_match("Mouse X", false)))
            .unwrap();
        r.unregister_virtual_axis("Mouse X");
        assert_eq!(backend.get_axis(&r, "Mouse X", false), Ok(0.0));
        // the flag is shared with the button namespace
        assert_eq!(backend.get_button(&r, "Mouse X"), Ok(false));
    }

    #[test]
    fn button_edges_come_from_the_cell() {
        let (hw, backend) = hardware();
        hw.bind_button("Jump");
        let mut r = Registry::new();
        let jump = Rc::new(VirtualButton::new("Jump"));
        r.register_virtual_button(jump.clone()).unwrap();
        jump.press();
        assert_eq!(backend.get_button(&r, "Jump"), Ok(true));
        assert_eq!(backend.get_button_down(&r, "Jump"), Ok(true));
        assert_eq!(backend.get_button_up(&r, "Jump"), Ok(false));
    }

    #[test]
    fn hardware_backend_cannot_write_unbound_names() {
        let (_, mut backend) = hardware();
        let mut r = Registry::new();
        assert_eq!(
            backend.set_axis(&mut r, "Horizontal", 1.0),
            Err(DispatchError::NotSettable {
                kind: InputKind::Axis,
                name: "Horizontal".into()
            })
        );
        assert!(backend.set_button_down(&mut r, "Jump").is_err());
        assert!(!r.axis_exists("Horizontal"));
    }

    #[test]
    fn hardware_backend_writes_existing_cells() {
        let (_, mut backend) = hardware();
        let mut r = Registry::new();
        let axis = Rc::new(VirtualAxis::new("Horizontal"));
        r.register_virtual_axis(axis.clone()).unwrap();
        backend.set_axis(&mut r, "Horizontal", 0.5).unwrap();
        assert_eq!(axis.value(), 0.5);
    }

    #[test]
    fn simulated_backend_never_consults_hardware() {
        let backend = SimulatedBackend::new();
        let r = Registry::new();
        assert!(backend.get_axis(&r, "Horizontal", false).is_err());
        assert!(backend.get_button_down(&r, "Jump").is_err());
    }

    #[test]
    fn simulated_writes_create_cells() {
        let mut backend = SimulatedBackend::new();
        let mut r = Registry::new();
        backend.set_axis(&mut r, "Vertical", -1.0).unwrap();
        backend.set_button_down(&mut r, "Jump").unwrap();
        assert!(r.axis_exists("Vertical"));
        assert_eq!(backend.get_axis(&r, "Vertical", false), Ok(-1.0));
        assert_eq!(backend.get_button_down(&r, "Jump"), Ok(true));
        backend.set_button_up(&mut r, "Jump").unwrap();
        assert_eq!(backend.get_button(&r, "Jump"), Ok(false));
        assert_eq!(backend.get_button_up(&r, "Jump"), Ok(true));
    }

    #[test]
    fn mouse_position_merges_per_component() {
        let (hw, backend) = hardware();
        hw.set_mouse_position(Vec3::new(10.0, 20.0, 30.0));
        let mut r = Registry::new();
        r.set_virtual_mouse_position_y(5.0);
        assert_eq!(backend.mouse_position(&r), Vec3::new(10.0, 5.0, 30.0));
        assert_eq!(
            SimulatedBackend::new().mouse_position(&r),
            Vec3::new(0.0, 5.0, 0.0)
        );
    }
}
