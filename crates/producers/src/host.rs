use std::collections::BTreeMap;

use crossinput_common::ProducerId;
use crossinput_registry::Registry;

use crate::axis_button::{AxisTouchButton, ButtonRole};
use crate::button_handler::ButtonHandler;
use crate::joystick::Joystick;
use crate::pairing::PairingIndex;
use crate::producer::{ActivationReport, Producer, ProducerError};

/// A producer owned by [`TouchControls`].
#[derive(Debug)]
pub enum Control {
    Joystick(Joystick),
    AxisButton(AxisTouchButton),
    Button(ButtonHandler),
}

impl Control {
    fn producer(&self) -> &dyn Producer {
        match self {
            Self::Joystick(p) => p,
            Self::AxisButton(p) => p,
            Self::Button(p) => p,
        }
    }

    fn producer_mut(&mut self) -> &mut dyn Producer {
        match self {
            Self::Joystick(p) => p,
            Self::AxisButton(p) => p,
            Self::Button(p) => p,
        }
    }

    pub fn id(&self) -> ProducerId {
        self.producer().id()
    }

    pub fn is_enabled(&self) -> bool {
        self.producer().is_enabled()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Joystick(_) => "joystick",
            Self::AxisButton(_) => "axis button",
            Self::Button(_) => "button handler",
        }
    }
}

/// Owner of a set of touch controls.
///
/// Enables producers in insertion order (so the first-registrant-wins
/// policy is deterministic), keeps the pairing index, and drives per-frame
/// axis-button decay. [`disable_all`](Self::disable_all) is the teardown
/// every session must reach.
#[derive(Debug, Default)]
pub struct TouchControls {
    controls: BTreeMap<ProducerId, Control>,
    order: Vec<ProducerId>,
    pairing: PairingIndex,
    registered: BTreeMap<ProducerId, Vec<String>>,
}

impl TouchControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Producer ids in insertion order.
    pub fn ids(&self) -> &[ProducerId] {
        &self.order
    }

    pub fn enabled_count(&self) -> usize {
        self.controls.values().filter(|c| c.is_enabled()).count()
    }

    pub fn pairing(&self) -> &PairingIndex {
        &self.pairing
    }

    fn insert(&mut self, control: Control) -> ProducerId {
        let id = control.id();
        self.controls.insert(id, control);
        self.order.push(id);
        id
    }

    pub fn add_joystick(&mut self, joystick: Joystick) -> ProducerId {
        self.insert(Control::Joystick(joystick))
    }

    pub fn add_axis_button(&mut self, button: AxisTouchButton) -> ProducerId {
        self.insert(Control::AxisButton(button))
    }

    pub fn add_button_handler(&mut self, handler: ButtonHandler) -> ProducerId {
        self.insert(Control::Button(handler))
    }

    pub fn get(&self, id: ProducerId) -> Option<&Control> {
        self.controls.get(&id)
    }

    pub fn joystick(&self, id: ProducerId) -> Result<&Joystick, ProducerError> {
        match self.controls.get(&id) {
            Some(Control::Joystick(j)) => Ok(j),
            Some(_) => Err(wrong_kind(id, "joystick")),
            None => Err(ProducerError::NotFound(id)),
        }
    }

    pub fn joystick_mut(&mut self, id: ProducerId) -> Result<&mut Joystick, ProducerError> {
        match self.controls.get_mut(&id) {
            Some(Control::Joystick(j)) => Ok(j),
            Some(_) => Err(wrong_kind(id, "joystick")),
            None => Err(ProducerError::NotFound(id)),
        }
    }

    pub fn axis_button(&self, id: ProducerId) -> Result<&AxisTouchButton, ProducerError> {
        match self.controls.get(&id) {
            Some(Control::AxisButton(b)) => Ok(b),
            Some(_) => Err(wrong_kind(id, "axis button")),
            None => Err(ProducerError::NotFound(id)),
        }
    }

    fn axis_button_mut(&mut self, id: ProducerId) -> Result<&mut AxisTouchButton, ProducerError> {
        match self.controls.get_mut(&id) {
            Some(Control::AxisButton(b)) => Ok(b),
            Some(_) => Err(wrong_kind(id, "axis button")),
            None => Err(ProducerError::NotFound(id)),
        }
    }

    pub fn button_handler(&self, id: ProducerId) -> Result<&ButtonHandler, ProducerError> {
        match self.controls.get(&id) {
            Some(Control::Button(h)) => Ok(h),
            Some(_) => Err(wrong_kind(id, "button handler")),
            None => Err(ProducerError::NotFound(id)),
        }
    }

    /// Enable one producer. Axis buttons also claim their pairing slot and
    /// look up a partner.
    pub fn enable(
        &mut self,
        id: ProducerId,
        registry: &mut Registry,
    ) -> Result<ActivationReport, ProducerError> {
        let control = self
            .controls
            .get_mut(&id)
            .ok_or(ProducerError::NotFound(id))?;
        let report = control.producer_mut().enable(registry);
        let is_axis_button = matches!(control, Control::AxisButton(_));
        self.registered
            .entry(id)
            .or_default()
            .extend(report.registered.iter().cloned());
        if is_axis_button {
            self.link_partner(id)?;
        }
        for conflict in &report.conflicts {
            tracing::warn!(producer = %id.short(), %conflict, "producer enabled with a conflicting name");
        }
        Ok(report)
    }

    /// Enable every producer in insertion order.
    pub fn enable_all(&mut self, registry: &mut Registry) -> Vec<(ProducerId, ActivationReport)> {
        let _span = tracing::debug_span!("enable_all", producers = self.order.len()).entered();
        let ids = self.order.clone();
        ids.into_iter()
            .filter_map(|id| self.enable(id, registry).ok().map(|r| (id, r)))
            .collect()
    }

    /// Claim the button's pairing slot, then point it at its partner and the
    /// partner back at it. No partner is fine; the button drives the axis
    /// one-sidedly. While another button holds the slot this one stays
    /// unpaired, and it claims the slot on a later call once it is free.
    fn link_partner(&mut self, id: ProducerId) -> Result<Option<ProducerId>, ProducerError> {
        let button = self.axis_button(id)?;
        let (name, role) = (button.axis_name().to_string(), button.role());
        if !self.pairing.claim(&name, role, id) {
            return Ok(None);
        }
        let partner = self.pairing.partner(&name, role);
        match partner {
            Some(partner_id) => {
                self.axis_button_mut(id)?.set_paired_with(Some(partner_id));
                if let Ok(other) = self.axis_button_mut(partner_id) {
                    other.set_paired_with(Some(id));
                }
            }
            None => tracing::debug!(button = %id.short(), "axis button has no partner yet"),
        }
        Ok(partner)
    }

    /// Disable one producer, removing the cells it registered.
    ///
    /// An axis button that created a shared axis hands removal duty to an
    /// enabled partner still bound to the same cell, so the survivor keeps
    /// a registered axis.
    pub fn disable(&mut self, id: ProducerId, registry: &mut Registry) -> Result<(), ProducerError> {
        if !self.controls.contains_key(&id) {
            return Err(ProducerError::NotFound(id));
        }
        let slot = self
            .axis_button(id)
            .ok()
            .filter(|b| b.is_enabled())
            .map(|b| (b.axis_name().to_string(), b.role(), b.paired_with()));
        if let Some((name, role, partner)) = slot {
            if let Some(heir) = self.heir_for(id) {
                tracing::debug!(from = %id.short(), to = %heir.short(), axis = %name, "axis ownership transferred");
                self.axis_button_mut(heir)?.adopt_axis();
                self.axis_button_mut(id)?.surrender_axis();
            }
            let held = self.pairing.holder(&name, role) == Some(id);
            self.pairing.release(&name, role, id);
            if let Some(Control::AxisButton(other)) = partner.and_then(|p| self.controls.get_mut(&p)) {
                other.set_paired_with(None);
            }
            if held && let Some(successor) = self.successor_for(id, &name, role) {
                tracing::debug!(from = %id.short(), to = %successor.short(), axis = %name, "pairing slot handed over");
                self.link_partner(successor)?;
            }
        }
        if let Some(control) = self.controls.get_mut(&id) {
            control.producer_mut().disable(registry);
        }
        self.registered.remove(&id);
        Ok(())
    }

    /// The earliest enabled axis button, other than `id`, waiting on the
    /// same (axis, role) slot.
    fn successor_for(&self, id: ProducerId, name: &str, role: ButtonRole) -> Option<ProducerId> {
        self.order.iter().copied().find(|other| {
            *other != id
                && self.axis_button(*other).is_ok_and(|b| {
                    b.is_enabled() && b.axis_name() == name && b.role() == role
                })
        })
    }

    /// An enabled axis button, other than `id`, bound to the cell `id` owns.
    fn heir_for(&self, id: ProducerId) -> Option<ProducerId> {
        let button = self.axis_button(id).ok()?;
        if !button.owns_axis() {
            return None;
        }
        self.order.iter().copied().find(|other| {
            *other != id
                && self
                    .axis_button(*other)
                    .is_ok_and(|b| b.is_enabled() && b.shares_axis_with(button))
        })
    }

    /// Disable everything, newest first.
    pub fn disable_all(&mut self, registry: &mut Registry) {
        let _span = tracing::debug_span!("disable_all", producers = self.order.len()).entered();
        let ids: Vec<ProducerId> = self.order.iter().rev().copied().collect();
        for id in ids {
            let _ = self.disable(id, registry);
        }
    }

    /// Disable and take ownership of a producer.
    pub fn remove(&mut self, id: ProducerId, registry: &mut Registry) -> Result<Control, ProducerError> {
        self.disable(id, registry)?;
        self.order.retain(|other| *other != id);
        self.controls
            .remove(&id)
            .ok_or(ProducerError::NotFound(id))
    }

    pub fn pointer_down(&mut self, id: ProducerId, dt: f32) -> Result<(), ProducerError> {
        let button = self.axis_button(id)?;
        if !button.is_enabled() {
            return Err(ProducerError::NotEnabled(id));
        }
        if button.paired_with().is_none() {
            self.link_partner(id)?;
        }
        self.axis_button_mut(id)?.on_pointer_down(dt);
        Ok(())
    }

    pub fn pointer_up(&mut self, id: ProducerId, dt: f32) -> Result<(), ProducerError> {
        let button = self.axis_button_mut(id)?;
        if !button.is_enabled() {
            return Err(ProducerError::NotEnabled(id));
        }
        button.on_pointer_up(dt);
        Ok(())
    }

    /// Advance every enabled axis button by one frame.
    pub fn update(&mut self, dt: f32) {
        let _span = tracing::trace_span!("touch_update", dt).entered();
        let held: Vec<(ProducerId, bool)> = self
            .order
            .iter()
            .filter_map(|id| {
                let button = self.axis_button(*id).ok()?;
                let partner_held = button
                    .paired_with()
                    .and_then(|p| self.axis_button(p).ok())
                    .is_some_and(|p| p.is_held());
                button.is_enabled().then_some((*id, partner_held))
            })
            .collect();
        for (id, partner_held) in held {
            if let Ok(button) = self.axis_button_mut(id) {
                button.update(dt, partner_held);
            }
        }
    }

    /// Names of cells enabled producers registered and still own.
    ///
    /// Names lost to an earlier registrant are not listed. An axis button
    /// counts its axis only while it owns it, so an adopted axis moves with
    /// the ownership.
    pub fn live_cells(&self) -> Vec<String> {
        let mut names = Vec::new();
        for id in &self.order {
            match self.controls.get(id) {
                Some(Control::AxisButton(b)) if b.is_enabled() && b.owns_axis() => {
                    names.push(b.axis_name().to_string());
                }
                Some(Control::AxisButton(_)) => {}
                Some(control) if control.is_enabled() => {
                    if let Some(registered) = self.registered.get(id) {
                        names.extend(registered.iter().cloned());
                    }
                }
                _ => {}
            }
        }
        names
    }
}

impl Drop for TouchControls {
    fn drop(&mut self) {
        let stale = self.live_cells();
        if !stale.is_empty() {
            tracing::warn!(?stale, "touch controls dropped without disable_all; cells stay registered");
        }
    }
}

fn wrong_kind(id: ProducerId, expected: &'static str) -> ProducerError {
    ProducerError::WrongKind { id, expected }
}
