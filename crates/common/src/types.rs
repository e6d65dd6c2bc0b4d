use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a live input producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProducerId(pub Uuid);

impl ProducerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ProducerId {
    fn default() -> Self {
        Self::new()
    }
}

/// Which namespace a name was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Axis,
    Button,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Axis => f.write_str("axis"),
            Self::Button => f.write_str("button"),
        }
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
///
/// A negative `max_delta` moves away from the target, matching the usual
/// game-engine definition.
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        return target;
    }
    current + (target - current).signum() * max_delta
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn producer_id_uniqueness() {
        let a = ProducerId::new();
        let b = ProducerId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn producer_id_short_is_eight_chars() {
        assert_eq!(ProducerId::new().short().len(), 8);
    }

    #[test]
    fn move_towards_steps_by_max_delta() {
        assert_eq!(move_towards(0.0, 1.0, 0.25), 0.25);
        assert_eq!(move_towards(0.0, -1.0, 0.25), -0.25);
    }

    #[test]
    fn move_towards_never_overshoots() {
        assert_eq!(move_towards(0.9, 1.0, 0.5), 1.0);
        assert_eq!(move_towards(-0.1, 0.0, 0.5), 0.0);
    }

    #[test]
    fn move_towards_at_target_stays() {
        assert_eq!(move_towards(1.0, 1.0, 0.1), 1.0);
        assert_eq!(move_towards(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn input_kind_display() {
        assert_eq!(InputKind::Axis.to_string(), "axis");
        assert_eq!(InputKind::Button.to_string(), "button");
    }
}
