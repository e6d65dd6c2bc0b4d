use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::cells::{AxisRef, ButtonRef};

/// A record produced by every structural change to the registry.
///
/// Value pushes and frame advances are not logged; they happen every frame
/// and the frame counter already records the latter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegistryEvent {
    AxisRegistered { name: String, always_virtual: bool },
    ButtonRegistered { name: String, always_virtual: bool },
    /// A duplicate was turned away; the earlier cell is still registered.
    AxisRejected { name: String },
    ButtonRejected { name: String },
    AxisUnregistered { name: String },
    ButtonUnregistered { name: String },
    Reset,
}

/// Errors from registry operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("there is already a virtual axis named {0} registered")]
    DuplicateAxis(String),
    #[error("there is already a virtual button named {0} registered")]
    DuplicateButton(String),
}

/// The authoritative map from names to virtual cells.
///
/// Producers register cells and push values into them; the dispatch layer
/// reads them. BTreeMap keeps iteration deterministic for inspection and
/// tests.
#[derive(Debug, Default)]
pub struct Registry {
    axes: BTreeMap<String, AxisRef>,
    buttons: BTreeMap<String, ButtonRef>,
    /// Names that must never fall back to hardware. Shared by both
    /// namespaces and only cleared by `reset`.
    always_virtual: BTreeSet<String>,
    virtual_mouse: [Option<f32>; 3],
    frame: u64,
    event_log: Vec<RegistryEvent>,
}

impl Registry {
    /// An empty registry at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn axis_exists(&self, name: &str) -> bool {
        self.axes.contains_key(name)
    }

    pub fn button_exists(&self, name: &str) -> bool {
        self.buttons.contains_key(name)
    }

    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Register an axis under its name.
    ///
    /// A second registration of the same name is rejected and the existing
    /// cell stays authoritative.
    pub fn register_virtual_axis(&mut self, axis: AxisRef) -> Result<(), RegistryError> {
        let name = axis.name().to_string();
        if self.axes.contains_key(&name) {
            tracing::error!(axis = %name, "there is already a virtual axis named {name} registered");
            self.event_log.push(RegistryEvent::AxisRejected { name: name.clone() });
            return Err(RegistryError::DuplicateAxis(name));
        }
        let always_virtual = !axis.match_with_input_manager();
        if always_virtual {
            self.always_virtual.insert(name.clone());
        }
        tracing::debug!(axis = %name, always_virtual, "registered virtual axis");
        self.axes.insert(name.clone(), axis);
        self.event_log.push(RegistryEvent::AxisRegistered {
            name,
            always_virtual,
        });
        Ok(())
    }

    /// Register a button under its name. Same conflict policy as axes.
    pub fn register_virtual_button(&mut self, button: ButtonRef) -> Result<(), RegistryError> {
        let name = button.name().to_string();
        if self.buttons.contains_key(&name) {
            tracing::error!(button = %name, "there is already a virtual button named {name} registered");
            self.event_log.push(RegistryEvent::ButtonRejected { name: name.clone() });
            return Err(RegistryError::DuplicateButton(name));
        }
        let always_virtual = !button.match_with_input_manager();
        if always_virtual {
            self.always_virtual.insert(name.clone());
        }
        tracing::debug!(button = %name, always_virtual, "registered virtual button");
        self.buttons.insert(name.clone(), button);
        self.event_log.push(RegistryEvent::ButtonRegistered {
            name,
            always_virtual,
        });
        Ok(())
    }

    /// Remove the axis registered under `name`. Absent names are a no-op.
    ///
    /// The always-virtual flag for the name stays until [`Registry::reset`].
    pub fn unregister_virtual_axis(&mut self, name: &str) -> Option<AxisRef> {
        let removed = self.axes.remove(name);
        if removed.is_some() {
            tracing::debug!(axis = %name, "unregistered virtual axis");
            self.event_log.push(RegistryEvent::AxisUnregistered {
                name: name.to_string(),
            });
        } else {
            tracing::debug!(axis = %name, "unregister of absent axis ignored");
        }
        removed
    }

    /// Remove the button registered under `name`. Absent names are a no-op.
    pub fn unregister_virtual_button(&mut self, name: &str) -> Option<ButtonRef> {
        let removed = self.buttons.remove(name);
        if removed.is_some() {
            tracing::debug!(button = %name, "unregistered virtual button");
            self.event_log.push(RegistryEvent::ButtonUnregistered {
                name: name.to_string(),
            });
        } else {
            tracing::debug!(button = %name, "unregister of absent button ignored");
        }
        removed
    }

    /// Unregister `cell` only if it is the cell currently registered under
    /// its name. Returns whether anything was removed.
    pub fn remove_axis_cell(&mut self, cell: &AxisRef) -> bool {
        let registered = self
            .axes
            .get(cell.name())
            .is_some_and(|current| Rc::ptr_eq(current, cell));
        if registered {
            self.unregister_virtual_axis(cell.name());
        }
        registered
    }

    pub fn remove_button_cell(&mut self, cell: &ButtonRef) -> bool {
        let registered = self
            .buttons
            .get(cell.name())
            .is_some_and(|current| Rc::ptr_eq(current, cell));
        if registered {
            self.unregister_virtual_button(cell.name());
        }
        registered
    }

    /// The registered axis, if any. Never creates one.
    pub fn virtual_axis_reference(&self, name: &str) -> Option<AxisRef> {
        self.axes.get(name).cloned()
    }

    pub fn virtual_button_reference(&self, name: &str) -> Option<ButtonRef> {
        self.buttons.get(name).cloned()
    }

    pub fn is_always_virtual(&self, name: &str) -> bool {
        self.always_virtual.contains(name)
    }

    pub fn always_virtual(&self) -> impl Iterator<Item = &str> {
        self.always_virtual.iter().map(String::as_str)
    }

    /// Read-only access to all axes (BTreeMap for deterministic iteration).
    pub fn axes(&self) -> &BTreeMap<String, AxisRef> {
        &self.axes
    }

    pub fn buttons(&self) -> &BTreeMap<String, ButtonRef> {
        &self.buttons
    }

    pub fn set_virtual_mouse_position_x(&mut self, x: f32) {
        self.virtual_mouse[0] = Some(x);
    }

    pub fn set_virtual_mouse_position_y(&mut self, y: f32) {
        self.virtual_mouse[1] = Some(y);
    }

    pub fn set_virtual_mouse_position_z(&mut self, z: f32) {
        self.virtual_mouse[2] = Some(z);
    }

    /// Per-component virtual mouse override; `None` components fall back.
    pub fn virtual_mouse_position(&self) -> [Option<f32>; 3] {
        self.virtual_mouse
    }

    pub fn clear_virtual_mouse_position(&mut self) {
        self.virtual_mouse = [None; 3];
    }

    /// Close the current frame: clear every button edge and bump the counter.
    pub fn advance_frame(&mut self) {
        for button in self.buttons.values() {
            button.clear_edges();
        }
        self.frame += 1;
    }

    /// Full teardown: forget every cell, the always-virtual set and the
    /// virtual mouse. The frame counter keeps running.
    pub fn reset(&mut self) {
        tracing::debug!(
            axes = self.axes.len(),
            buttons = self.buttons.len(),
            "registry reset"
        );
        self.axes.clear();
        self.buttons.clear();
        self.always_virtual.clear();
        self.virtual_mouse = [None; 3];
        self.event_log.push(RegistryEvent::Reset);
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.event_log
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.event_log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells::{VirtualAxis, VirtualButton};

    fn axis(name: &str) -> AxisRef {
        Rc::new(VirtualAxis::new(name))
    }

    #[test]
    fn registry_starts_empty() {
        let r = Registry::new();
        assert_eq!(r.frame(), 0);
        assert_eq!(r.axis_count(), 0);
        assert_eq!(r.button_count(), 0);
        assert!(r.events().is_empty());
    }

    #[test]
    fn register_and_lookup_axis() {
        let mut r = Registry::new();
        let a = axis("Horizontal");
        r.register_virtual_axis(a.clone()).unwrap();
        assert!(r.axis_exists("Horizontal"));
        assert!(!r.button_exists("Horizontal"));
        let found = r.virtual_axis_reference("Horizontal").unwrap();
        assert!(Rc::ptr_eq(&found, &a));
    }

    #[test]
    fn duplicate_axis_keeps_first() {
        let mut r = Registry::new();
        let first = axis("Horizontal");
        let second = axis("Horizontal");
        r.register_virtual_axis(first.clone()).unwrap();
        let err = r.register_virtual_axis(second).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateAxis("Horizontal".into()));
        let found = r.virtual_axis_reference("Horizontal").unwrap();
        assert!(Rc::ptr_eq(&found, &first));
        assert_eq!(r.axis_count(), 1);
    }

    #[test]
    fn duplicate_button_keeps_first() {
        let mut r = Registry::new();
        let first = Rc::new(VirtualButton::new("Jump"));
        r.register_virtual_button(first.clone()).unwrap();
        assert!(r.register_virtual_button(Rc::new(VirtualButton::new("Jump"))).is_err());
        assert!(Rc::ptr_eq(&r.virtual_button_reference("Jump").unwrap(), &first));
    }

    #[test]
    fn rejected_duplicate_does_not_touch_always_virtual() {
        let mut r = Registry::new();
        r.register_virtual_axis(axis("Horizontal")).unwrap();
        let _ = r.register_virtual_axis(Rc::new(VirtualAxis::with_match("Horizontal", false)));
        assert!(!r.is_always_virtual("Horizontal"));
    }

    #[test]
    fn axes_and_buttons_are_separate_namespaces() {
        let mut r = Registry::new();
        r.register_virtual_axis(axis("Jump")).unwrap();
        r.register_virtual_button(Rc::new(VirtualButton::new("Jump")))
            .unwrap();
        assert!(r.axis_exists("Jump"));
        assert!(r.button_exists("Jump"));
    }

    #[test]
    fn reference_never_fabricates() {
        let r = Registry::new();
        assert!(r.virtual_axis_reference("Nope").is_none());
        assert!(r.virtual_button_reference("Nope").is_none());
        assert_eq!(r.axis_count(), 0);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut r = Registry::new();
        r.register_virtual_axis(axis("Vertical")).unwrap();
        assert!(r.unregister_virtual_axis("Vertical").is_some());
        let events_after_first = r.events().len();
        assert!(r.unregister_virtual_axis("Vertical").is_none());
        assert!(!r.axis_exists("Vertical"));
        assert_eq!(r.events().len(), events_after_first);
    }

    #[test]
    fn always_virtual_is_sticky_after_unregister() {
        let mut r = Registry::new();
        r.register_virtual_button(Rc::new(VirtualButton::with_match("Jump", false)))
            .unwrap();
        assert!(r.is_always_virtual("Jump"));
        r.unregister_virtual_button("Jump");
        assert!(r.is_always_virtual("Jump"));
    }

    #[test]
    fn reset_clears_always_virtual() {
        let mut r = Registry::new();
        r.register_virtual_axis(Rc::new(VirtualAxis::with_match("Mouse X", false)))
            .unwrap();
        r.set_virtual_mouse_position_x(3.0);
        r.reset();
        assert!(!r.is_always_virtual("Mouse X"));
        assert!(!r.axis_exists("Mouse X"));
        assert_eq!(r.virtual_mouse_position(), [None; 3]);
    }

    #[test]
    fn remove_cell_only_removes_itself() {
        let mut r = Registry::new();
        let first = axis("Horizontal");
        let rejected = axis("Horizontal");
        r.register_virtual_axis(first.clone()).unwrap();
        let _ = r.register_virtual_axis(rejected.clone());

        assert!(!rejected.remove(&mut r));
        assert!(r.axis_exists("Horizontal"));
        assert!(first.remove(&mut r));
        assert!(!r.axis_exists("Horizontal"));
        assert!(!first.remove(&mut r));
    }

    #[test]
    fn advance_frame_clears_button_edges() {
        let mut r = Registry::new();
        let jump = Rc::new(VirtualButton::new("Jump"));
        r.register_virtual_button(jump.clone()).unwrap();
        jump.press();
        assert!(jump.button_down());
        r.advance_frame();
        assert_eq!(r.frame(), 1);
        assert!(!jump.button_down());
        assert!(jump.is_pressed());
    }

    #[test]
    fn virtual_mouse_components_are_independent() {
        let mut r = Registry::new();
        r.set_virtual_mouse_position_y(2.0);
        assert_eq!(r.virtual_mouse_position(), [None, Some(2.0), None]);
        r.set_virtual_mouse_position_x(1.0);
        r.set_virtual_mouse_position_z(3.0);
        assert_eq!(
            r.virtual_mouse_position(),
            [Some(1.0), Some(2.0), Some(3.0)]
        );
        r.clear_virtual_mouse_position();
        assert_eq!(r.virtual_mouse_position(), [None; 3]);
    }

    #[test]
    fn events_are_recorded() {
        let mut r = Registry::new();
        r.register_virtual_axis(axis("Horizontal")).unwrap();
        let _ = r.register_virtual_axis(axis("Horizontal"));
        r.advance_frame();
        r.unregister_virtual_axis("Horizontal");
        assert_eq!(
            r.events(),
            &[
                RegistryEvent::AxisRegistered {
                    name: "Horizontal".into(),
                    always_virtual: false
                },
                RegistryEvent::AxisRejected {
                    name: "Horizontal".into()
                },
                RegistryEvent::AxisUnregistered {
                    name: "Horizontal".into()
                },
            ]
        );
    }

    #[test]
    fn frame_advances_do_not_grow_the_log() {
        let mut r = Registry::new();
        r.register_virtual_button(Rc::new(VirtualButton::new("Jump")))
            .unwrap();
        for _ in 0..10_000 {
            r.advance_frame();
        }
        assert_eq!(r.frame(), 10_000);
        assert_eq!(r.events().len(), 1);
    }

    #[test]
    fn drain_events_clears_log() {
        let mut r = Registry::new();
        r.register_virtual_axis(axis("Horizontal")).unwrap();
        assert_eq!(r.drain_events().len(), 1);
        assert!(r.events().is_empty());
    }

    #[test]
    fn always_virtual_iterates_in_order() {
        let mut r = Registry::new();
        r.register_virtual_axis(Rc::new(VirtualAxis::with_match("b", false)))
            .unwrap();
        r.register_virtual_button(Rc::new(VirtualButton::with_match("a", false)))
            .unwrap();
        let names: Vec<&str> = r.always_virtual().collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
