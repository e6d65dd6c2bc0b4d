use std::rc::Rc;

use crossinput_common::{InputKind, ProducerId, names};
use crossinput_registry::{AxisRef, ButtonRef, Registry, VirtualAxis, VirtualButton};
use serde::{Deserialize, Serialize};

use crate::producer::{ActivationReport, Producer, ProducerError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonHandlerConfig {
    pub name: String,
    /// `false` makes the name always-virtual once registered.
    pub match_with_input_manager: bool,
    /// Also register an axis of the same name for the axis-state pushes.
    pub with_axis: bool,
}

impl Default for ButtonHandlerConfig {
    fn default() -> Self {
        Self {
            name: names::JUMP.into(),
            match_with_input_manager: true,
            with_axis: false,
        }
    }
}

/// A plain touch button wired to UI press/release callbacks.
#[derive(Debug)]
pub struct ButtonHandler {
    id: ProducerId,
    config: ButtonHandlerConfig,
    button: Option<ButtonRef>,
    axis: Option<AxisRef>,
    enabled: bool,
}

impl ButtonHandler {
    pub fn new(config: ButtonHandlerConfig) -> Self {
        Self {
            id: ProducerId::new(),
            config,
            button: None,
            axis: None,
            enabled: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &ButtonHandlerConfig {
        &self.config
    }

    fn button(&self) -> Result<&ButtonRef, ProducerError> {
        self.button.as_ref().ok_or(ProducerError::NotEnabled(self.id))
    }

    fn axis(&self) -> Result<&AxisRef, ProducerError> {
        if !self.enabled {
            return Err(ProducerError::NotEnabled(self.id));
        }
        self.axis.as_ref().ok_or_else(|| ProducerError::NoCompanion {
            name: self.config.name.clone(),
            kind: InputKind::Axis,
        })
    }

    pub fn set_down_state(&self) -> Result<(), ProducerError> {
        self.button()?.press();
        Ok(())
    }

    pub fn set_up_state(&self) -> Result<(), ProducerError> {
        self.button()?.release();
        Ok(())
    }

    pub fn set_axis_positive_state(&self) -> Result<(), ProducerError> {
        self.axis()?.update(1.0);
        Ok(())
    }

    pub fn set_axis_neutral_state(&self) -> Result<(), ProducerError> {
        self.axis()?.update(0.0);
        Ok(())
    }

    pub fn set_axis_negative_state(&self) -> Result<(), ProducerError> {
        self.axis()?.update(-1.0);
        Ok(())
    }
}

impl Producer for ButtonHandler {
    fn id(&self) -> ProducerId {
        self.id
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self, registry: &mut Registry) -> ActivationReport {
        let mut report = ActivationReport::default();
        if self.enabled {
            return report;
        }
        let name = self.config.name.as_str();
        let button = Rc::new(VirtualButton::with_match(
            name,
            self.config.match_with_input_manager,
        ));
        report.record(name, registry.register_virtual_button(button.clone()));
        self.button = Some(button);

        if self.config.with_axis {
            let axis = Rc::new(VirtualAxis::with_match(
                name,
                self.config.match_with_input_manager,
            ));
            report.record(name, registry.register_virtual_axis(axis.clone()));
            self.axis = Some(axis);
        }
        self.enabled = true;
        tracing::debug!(handler = %self.id.short(), button = %name, "button handler enabled");
        report
    }

    fn disable(&mut self, registry: &mut Registry) {
        if !self.enabled {
            return;
        }
        if let Some(button) = self.button.take() {
            button.remove(registry);
        }
        if let Some(axis) = self.axis.take() {
            axis.remove(registry);
        }
        self.enabled = false;
        tracing::debug!(handler = %self.id.short(), "button handler disabled");
    }
}
