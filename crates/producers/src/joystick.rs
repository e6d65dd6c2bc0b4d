use std::rc::Rc;

use crossinput_common::{ProducerId, names};
use crossinput_registry::{AxisRef, Registry, VirtualAxis};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::producer::{ActivationReport, Producer};

/// Which directions a joystick drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisOption {
    #[default]
    Both,
    OnlyHorizontal,
    OnlyVertical,
}

impl AxisOption {
    pub fn uses_horizontal(self) -> bool {
        matches!(self, Self::Both | Self::OnlyHorizontal)
    }

    pub fn uses_vertical(self) -> bool {
        matches!(self, Self::Both | Self::OnlyVertical)
    }
}

/// Joystick configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    /// Maximum handle travel from the start position, in screen pixels.
    pub movement_range: i32,
    pub axes_to_use: AxisOption,
    pub horizontal_axis_name: String,
    pub vertical_axis_name: String,
    /// Handle rest position in y-down screen space.
    pub start_position: Vec2,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            movement_range: 100,
            axes_to_use: AxisOption::Both,
            horizontal_axis_name: names::HORIZONTAL.into(),
            vertical_axis_name: names::VERTICAL.into(),
            start_position: Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// An on-screen stick driven by pointer drags.
///
/// Pointer positions are in y-down screen space, so dragging up yields a
/// positive vertical axis.
#[derive(Debug)]
pub struct Joystick {
    id: ProducerId,
    config: JoystickConfig,
    position: Vec2,
    state: DragState,
    horizontal: Option<AxisRef>,
    vertical: Option<AxisRef>,
    enabled: bool,
}

impl Joystick {
    pub fn new(config: JoystickConfig) -> Self {
        let position = config.start_position;
        Self {
            id: ProducerId::new(),
            config,
            position,
            state: DragState::Idle,
            horizontal: None,
            vertical: None,
            enabled: false,
        }
    }

    pub fn config(&self) -> &JoystickConfig {
        &self.config
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    /// Current handle position.
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn start_position(&self) -> Vec2 {
        self.config.start_position
    }

    /// Move the rest position, e.g. after a layout change. The handle snaps
    /// to it.
    pub fn set_start_position(&mut self, start: Vec2) {
        self.config.start_position = start;
        self.position = start;
    }

    fn range(&self) -> i32 {
        self.config.movement_range.max(1)
    }

    pub fn on_pointer_down(&mut self, _pointer: Vec2) {
        self.state = DragState::Dragging;
    }

    /// Move the handle toward `pointer`, clamped per component to the
    /// movement range, and push the resulting axis values.
    pub fn on_drag(&mut self, pointer: Vec2) {
        self.state = DragState::Dragging;
        let start = self.config.start_position;
        let range = self.range();
        let mut offset = Vec2::ZERO;
        if self.config.axes_to_use.uses_horizontal() {
            let delta = (pointer.x - start.x) as i32;
            offset.x = delta.clamp(-range, range) as f32;
        }
        if self.config.axes_to_use.uses_vertical() {
            let delta = (pointer.y - start.y) as i32;
            offset.y = delta.clamp(-range, range) as f32;
        }
        self.position = start + offset;
        self.push_axes();
    }

    /// Snap back to the start position and zero every bound axis.
    pub fn on_pointer_up(&mut self) {
        self.state = DragState::Idle;
        self.position = self.config.start_position;
        self.push_axes();
    }

    fn push_axes(&self) {
        let offset = (self.position - self.config.start_position) / self.range() as f32;
        if let Some(axis) = &self.horizontal {
            axis.update(offset.x);
        }
        if let Some(axis) = &self.vertical {
            axis.update(-offset.y);
        }
    }

    fn create_axis(name: &str, registry: &mut Registry, report: &mut ActivationReport) -> AxisRef {
        let axis = Rc::new(VirtualAxis::new(name));
        report.record(name, registry.register_virtual_axis(axis.clone()));
        axis
    }
}

impl Producer for Joystick {
    fn id(&self) -> ProducerId {
        self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create one axis per used direction. On a name conflict the joystick
    /// keeps its own unregistered cell; the earlier one stays authoritative.
    fn enable(&mut self, registry: &mut Registry) -> ActivationReport {
        let mut report = ActivationReport::default();
        if self.enabled {
            return report;
        }
        if self.config.axes_to_use.uses_horizontal() {
            self.horizontal = Some(Self::create_axis(
                &self.config.horizontal_axis_name,
                registry,
                &mut report,
            ));
        }
        if self.config.axes_to_use.uses_vertical() {
            self.vertical = Some(Self::create_axis(
                &self.config.vertical_axis_name,
                registry,
                &mut report,
            ));
        }
        self.enabled = true;
        tracing::debug!(joystick = %self.id.short(), ?report, "joystick enabled");
        report
    }

    fn disable(&mut self, registry: &mut Registry) {
        if !self.enabled {
            return;
        }
        for axis in [self.horizontal.take(), self.vertical.take()]
            .into_iter()
            .flatten()
        {
            axis.remove(registry);
        }
        self.state = DragState::Idle;
        self.position = self.config.start_position;
        self.enabled = false;
        tracing::debug!(joystick = %self.id.short(), "joystick disabled");
    }
}
