use crossinput_common::InputKind;
use crossinput_registry::{Registry, VirtualAxis, VirtualButton};

/// Registry inspector for developer tooling.
///
/// Read-only queries against the registry for debugging and the CLI.
pub struct RegistryInspector;

impl RegistryInspector {
    /// Produce a summary of the registry state.
    pub fn summary(registry: &Registry) -> RegistrySummary {
        let _span = tracing::debug_span!("registry_summary", frame = registry.frame()).entered();
        RegistrySummary {
            frame: registry.frame(),
            axis_count: registry.axis_count(),
            button_count: registry.button_count(),
            always_virtual: registry.always_virtual().map(str::to_string).collect(),
            pending_events: registry.events().len(),
        }
    }

    pub fn inspect_axis(registry: &Registry, name: &str) -> Option<CellInfo> {
        registry
            .virtual_axis_reference(name)
            .map(|axis| CellInfo::from_axis(&axis))
    }

    pub fn inspect_button(registry: &Registry, name: &str) -> Option<CellInfo> {
        registry
            .virtual_button_reference(name)
            .map(|button| CellInfo::from_button(&button))
    }

    /// Every registered cell, axes first, each namespace in name order.
    pub fn cells(registry: &Registry) -> Vec<CellInfo> {
        let _span = tracing::debug_span!("registry_cells").entered();
        let axes = registry.axes().values().map(|a| CellInfo::from_axis(a));
        let buttons = registry.buttons().values().map(|b| CellInfo::from_button(b));
        axes.chain(buttons).collect()
    }

    /// Registered names in one namespace.
    pub fn list_names(registry: &Registry, kind: InputKind) -> Vec<String> {
        match kind {
            InputKind::Axis => registry.axes().keys().cloned().collect(),
            InputKind::Button => registry.buttons().keys().cloned().collect(),
        }
    }
}

/// Summary of registry state for the inspector.
#[derive(Debug, Clone)]
pub struct RegistrySummary {
    pub frame: u64,
    pub axis_count: usize,
    pub button_count: usize,
    pub always_virtual: Vec<String>,
    pub pending_events: usize,
}

impl std::fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registry: frame={} axes={} buttons={} pending_events={}",
            self.frame, self.axis_count, self.button_count, self.pending_events
        )?;
        if !self.always_virtual.is_empty() {
            write!(f, " always_virtual=[{}]", self.always_virtual.join(", "))?;
        }
        Ok(())
    }
}

/// Snapshot of a single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellInfo {
    Axis {
        name: String,
        value: f32,
        match_with_input_manager: bool,
    },
    Button {
        name: String,
        pressed: bool,
        down: bool,
        up: bool,
        match_with_input_manager: bool,
    },
}

impl CellInfo {
    fn from_axis(axis: &VirtualAxis) -> Self {
        Self::Axis {
            name: axis.name().to_string(),
            value: axis.value(),
            match_with_input_manager: axis.match_with_input_manager(),
        }
    }

    fn from_button(button: &VirtualButton) -> Self {
        Self::Button {
            name: button.name().to_string(),
            pressed: button.is_pressed(),
            down: button.button_down(),
            up: button.button_up(),
            match_with_input_manager: button.match_with_input_manager(),
        }
    }

    pub fn kind(&self) -> InputKind {
        match self {
            Self::Axis { .. } => InputKind::Axis,
            Self::Button { .. } => InputKind::Button,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Axis { name, .. } | Self::Button { name, .. } => name,
        }
    }
}

impl std::fmt::Display for CellInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Axis {
                name,
                value,
                match_with_input_manager,
            } => write!(
                f,
                "axis   {name:<16} value={value:+.3}{}",
                if *match_with_input_manager { "" } else { " (virtual only)" }
            ),
            Self::Button {
                name,
                pressed,
                down,
                up,
                match_with_input_manager,
            } => write!(
                f,
                "button {name:<16} pressed={pressed} down={down} up={up}{}",
                if *match_with_input_manager { "" } else { " (virtual only)" }
            ),
        }
    }
}
