use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::axis_button::{AxisButtonConfig, AxisTouchButton};
use crate::button_handler::{ButtonHandler, ButtonHandlerConfig};
use crate::host::TouchControls;
use crate::joystick::{Joystick, JoystickConfig};

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported layout format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("joystick {index}: movement_range must be positive, got {range}")]
    InvalidRange { index: usize, range: i32 },
    #[error("axis button {index}: response_speed must be positive, got {speed}")]
    InvalidSpeed { index: usize, speed: f32 },
    #[error("{control} {index}: empty name")]
    EmptyName { control: &'static str, index: usize },
}

/// A declarative set of touch controls.
///
/// ```yaml
/// joysticks:
///   - movement_range: 120
///     axes_to_use: both
/// axis_buttons:
///   - { axis_name: Horizontal, axis_value: 1.0 }
///   - { axis_name: Horizontal, axis_value: -1.0 }
/// buttons:
///   - name: Jump
/// ```
///
/// Controls are added to the host in document order: joysticks, then axis
/// buttons, then button handlers. Enable order follows, so on a name
/// conflict the earlier entry keeps the name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlLayout {
    pub joysticks: Vec<JoystickConfig>,
    pub axis_buttons: Vec<AxisButtonConfig>,
    pub buttons: Vec<ButtonHandlerConfig>,
}

impl ControlLayout {
    pub fn from_yaml_str(s: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_yaml::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_json_str(s: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(s)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load from a `.yaml`/`.yml` or `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let layout = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&text)?,
            Some("json") => Self::from_json_str(&text)?,
            _ => return Err(LayoutError::UnsupportedFormat(path.to_path_buf())),
        };
        tracing::info!(
            path = %path.display(),
            joysticks = layout.joysticks.len(),
            axis_buttons = layout.axis_buttons.len(),
            buttons = layout.buttons.len(),
            "control layout loaded"
        );
        Ok(layout)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for (index, stick) in self.joysticks.iter().enumerate() {
            if stick.movement_range <= 0 {
                return Err(LayoutError::InvalidRange {
                    index,
                    range: stick.movement_range,
                });
            }
            let used = [
                (stick.axes_to_use.uses_horizontal(), &stick.horizontal_axis_name),
                (stick.axes_to_use.uses_vertical(), &stick.vertical_axis_name),
            ];
            if used.iter().any(|(on, name)| *on && name.is_empty()) {
                return Err(LayoutError::EmptyName {
                    control: "joystick",
                    index,
                });
            }
        }
        for (index, button) in self.axis_buttons.iter().enumerate() {
            if button.response_speed.is_nan() || button.response_speed <= 0.0 {
                return Err(LayoutError::InvalidSpeed {
                    index,
                    speed: button.response_speed,
                });
            }
            if button.axis_name.is_empty() {
                return Err(LayoutError::EmptyName {
                    control: "axis button",
                    index,
                });
            }
        }
        for (index, handler) in self.buttons.iter().enumerate() {
            if handler.name.is_empty() {
                return Err(LayoutError::EmptyName {
                    control: "button",
                    index,
                });
            }
        }
        Ok(())
    }

    /// Instantiate every control into a fresh host. Nothing is enabled yet.
    pub fn build(&self) -> TouchControls {
        let mut controls = TouchControls::new();
        for config in &self.joysticks {
            controls.add_joystick(Joystick::new(config.clone()));
        }
        for config in &self.axis_buttons {
            controls.add_axis_button(AxisTouchButton::new(config.clone()));
        }
        for config in &self.buttons {
            controls.add_button_handler(ButtonHandler::new(config.clone()));
        }
        controls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joystick::AxisOption;
    use crossinput_registry::Registry;
    use glam::Vec2;
    use std::io::Write;

    const YAML: &str = r#"
joysticks:
  - movement_range: 120
    axes_to_use: only_horizontal
    horizontal_axis_name: Steer
    start_position: [64.0, 400.0]
axis_buttons:
  - { axis_name: Throttle, axis_value: 1.0, response_speed: 2.0 }
  - { axis_name: Throttle, axis_value: -1.0, response_speed: 2.0 }
buttons:
  - name: Jump
  - name: Fire
    match_with_input_manager: false
"#;

    #[test]
    fn parses_yaml_with_defaults() {
        let layout = ControlLayout::from_yaml_str(YAML).unwrap();
        assert_eq!(layout.joysticks.len(), 1);
        let stick = &layout.joysticks[0];
        assert_eq!(stick.axes_to_use, AxisOption::OnlyHorizontal);
        assert_eq!(stick.start_position, Vec2::new(64.0, 400.0));
        assert_eq!(stick.vertical_axis_name, "Vertical");
        assert_eq!(layout.axis_buttons[1].axis_value, -1.0);
        assert_eq!(layout.axis_buttons[1].return_to_centre_speed, 3.0);
        assert!(layout.buttons[0].match_with_input_manager);
        assert!(!layout.buttons[1].match_with_input_manager);
    }

    #[test]
    fn empty_document_is_empty_layout() {
        let layout = ControlLayout::from_yaml_str("{}").unwrap();
        assert_eq!(layout, ControlLayout::default());
        assert!(layout.build().is_empty());
    }

    #[test]
    fn build_then_enable_registers_everything() {
        let layout = ControlLayout::from_yaml_str(YAML).unwrap();
        let mut controls = layout.build();
        assert_eq!(controls.len(), 5);
        let mut registry = Registry::new();
        let reports = controls.enable_all(&mut registry);
        assert!(reports.iter().all(|(_, r)| r.is_clean()));
        assert!(registry.axis_exists("Steer"));
        assert!(registry.axis_exists("Throttle"));
        assert!(!registry.axis_exists("Vertical"));
        assert!(registry.button_exists("Fire"));
        assert!(registry.is_always_virtual("Fire"));
        controls.disable_all(&mut registry);
        assert_eq!(registry.axis_count() + registry.button_count(), 0);
    }

    #[test]
    fn rejects_zero_range() {
        let err = ControlLayout::from_yaml_str("joysticks:\n  - movement_range: 0\n").unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRange { index: 0, range: 0 }));
    }

    #[test]
    fn rejects_non_positive_speed() {
        let json = r#"{"axis_buttons": [{"response_speed": -1.0}]}"#;
        let err = ControlLayout::from_json_str(json).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidSpeed { index: 0, .. }));
    }

    #[test]
    fn rejects_empty_names() {
        let err = ControlLayout::from_yaml_str("buttons:\n  - name: ''\n").unwrap_err();
        assert!(matches!(err, LayoutError::EmptyName { control: "button", index: 0 }));
        // an unused direction may be left unnamed
        let ok = "joysticks:\n  - axes_to_use: only_vertical\n    horizontal_axis_name: ''\n";
        assert!(ControlLayout::from_yaml_str(ok).is_ok());
    }

    #[test]
    fn load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("touch.yaml");
        std::fs::write(&yaml, YAML).unwrap();
        assert_eq!(ControlLayout::load(&yaml).unwrap().buttons.len(), 2);

        let json = dir.path().join("touch.json");
        let mut file = std::fs::File::create(&json).unwrap();
        let layout = ControlLayout::from_yaml_str(YAML).unwrap();
        file.write_all(serde_json::to_string(&layout).unwrap().as_bytes())
            .unwrap();
        assert_eq!(ControlLayout::load(&json).unwrap(), layout);

        let toml = dir.path().join("touch.toml");
        std::fs::write(&toml, "").unwrap();
        assert!(matches!(
            ControlLayout::load(&toml),
            Err(LayoutError::UnsupportedFormat(_))
        ));
    }
}
