use std::rc::Rc;

use crossinput_common::{ProducerId, move_towards, names};
use crossinput_registry::{AxisRef, Registry, VirtualAxis};
use serde::{Deserialize, Serialize};

use crate::producer::{ActivationReport, Producer};

/// Axis touch button configuration. Buttons are normally placed in pairs,
/// one with `axis_value = 1` and one with `-1`, on the same axis name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisButtonConfig {
    pub axis_name: String,
    /// Target value while held.
    pub axis_value: f32,
    /// Units per second, used both while held and on release.
    pub response_speed: f32,
    /// Exposed for layouts but not read: the release path moves at
    /// `response_speed`. Kept that way until the integrators decide.
    pub return_to_centre_speed: f32,
}

impl Default for AxisButtonConfig {
    fn default() -> Self {
        Self {
            axis_name: names::HORIZONTAL.into(),
            axis_value: 1.0,
            response_speed: 3.0,
            return_to_centre_speed: 3.0,
        }
    }
}

/// Side of the axis a button drives; the pairing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ButtonRole {
    Positive,
    Negative,
}

impl ButtonRole {
    pub fn of(axis_value: f32) -> Self {
        if axis_value >= 0.0 {
            Self::Positive
        } else {
            Self::Negative
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Positive => Self::Negative,
            Self::Negative => Self::Positive,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressState {
    Idle,
    Held,
    /// Released, still decaying toward zero.
    Returning,
}

/// A touch button that moves a shared axis toward its value while held.
#[derive(Debug)]
pub struct AxisTouchButton {
    id: ProducerId,
    config: AxisButtonConfig,
    axis: Option<AxisRef>,
    /// Whether this button registered the cell (and so must remove it).
    owns_axis: bool,
    paired_with: Option<ProducerId>,
    state: PressState,
    /// A pointer event already stepped the axis this frame.
    stepped: bool,
    enabled: bool,
}

impl AxisTouchButton {
    pub fn new(config: AxisButtonConfig) -> Self {
        Self {
            id: ProducerId::new(),
            config,
            axis: None,
            owns_axis: false,
            paired_with: None,
            state: PressState::Idle,
            stepped: false,
            enabled: false,
        }
    }

    pub fn config(&self) -> &AxisButtonConfig {
        &self.config
    }

    pub fn axis_name(&self) -> &str {
        &self.config.axis_name
    }

    pub fn role(&self) -> ButtonRole {
        ButtonRole::of(self.config.axis_value)
    }

    pub fn state(&self) -> PressState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        self.state == PressState::Held
    }

    pub fn paired_with(&self) -> Option<ProducerId> {
        self.paired_with
    }

    pub fn set_paired_with(&mut self, partner: Option<ProducerId>) {
        self.paired_with = partner;
    }

    pub fn owns_axis(&self) -> bool {
        self.owns_axis
    }

    /// The shared cell, while enabled.
    pub fn axis(&self) -> Option<&AxisRef> {
        self.axis.as_ref()
    }

    /// Whether `other` pushes into the same cell as this button.
    pub fn shares_axis_with(&self, other: &AxisTouchButton) -> bool {
        match (&self.axis, &other.axis) {
            (Some(a), Some(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Take over removal duty for the shared cell.
    pub(crate) fn adopt_axis(&mut self) {
        self.owns_axis = true;
    }

    pub(crate) fn surrender_axis(&mut self) {
        self.owns_axis = false;
    }

    pub fn value(&self) -> f32 {
        self.axis.as_ref().map_or(0.0, |axis| axis.value())
    }

    fn step_toward(&self, target: f32, dt: f32) {
        if let Some(axis) = &self.axis {
            let next = move_towards(axis.value(), target, self.config.response_speed * dt);
            axis.update(next);
        }
    }

    /// Start holding: one bounded step toward the button's value.
    pub fn on_pointer_down(&mut self, dt: f32) {
        self.state = PressState::Held;
        self.stepped = true;
        self.step_toward(self.config.axis_value, dt);
    }

    /// Let go: one bounded step back toward zero at `response_speed`.
    pub fn on_pointer_up(&mut self, dt: f32) {
        self.state = PressState::Returning;
        self.stepped = true;
        self.step_toward(0.0, dt);
        if self.value() == 0.0 {
            self.state = PressState::Idle;
        }
    }

    /// Per-frame continuation of a hold or a release.
    ///
    /// A returning button leaves the axis alone while its partner is held.
    /// A frame that already saw a pointer event is not stepped twice.
    pub fn update(&mut self, dt: f32, partner_held: bool) {
        if std::mem::take(&mut self.stepped) {
            return;
        }
        match self.state {
            PressState::Idle => {}
            PressState::Held => self.step_toward(self.config.axis_value, dt),
            PressState::Returning => {
                if partner_held {
                    self.state = PressState::Idle;
                    return;
                }
                self.step_toward(0.0, dt);
                if self.value() == 0.0 {
                    self.state = PressState::Idle;
                }
            }
        }
    }
}

impl Producer for AxisTouchButton {
    fn id(&self) -> ProducerId {
        self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Bind to the axis if a partner already created it, otherwise create
    /// and register it.
    fn enable(&mut self, registry: &mut Registry) -> ActivationReport {
        let mut report = ActivationReport::default();
        if self.enabled {
            return report;
        }
        let name = self.config.axis_name.clone();
        match registry.virtual_axis_reference(&name) {
            Some(existing) => {
                self.axis = Some(existing);
                self.owns_axis = false;
                report.bound.push(name);
            }
            None => {
                let axis = Rc::new(VirtualAxis::new(name.as_str()));
                report.record(&name, registry.register_virtual_axis(axis.clone()));
                self.axis = Some(axis);
                self.owns_axis = true;
            }
        }
        self.state = PressState::Idle;
        self.enabled = true;
        tracing::debug!(button = %self.id.short(), axis = %self.config.axis_name, owns = self.owns_axis, "axis button enabled");
        report
    }

    fn disable(&mut self, registry: &mut Registry) {
        if !self.enabled {
            return;
        }
        if let Some(axis) = self.axis.take() {
            if self.owns_axis {
                axis.remove(registry);
            }
        }
        self.owns_axis = false;
        self.paired_with = None;
        self.state = PressState::Idle;
        self.stepped = false;
        self.enabled = false;
        tracing::debug!(button = %self.id.short(), "axis button disabled");
    }
}
