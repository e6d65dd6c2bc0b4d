use std::collections::BTreeMap;

use crossinput_common::ProducerId;

use crate::axis_button::ButtonRole;

/// Index of axis buttons keyed by (axis name, role).
///
/// Each slot holds at most one producer; the first to claim it keeps it.
/// A button's partner is whoever holds the opposite role on the same axis.
#[derive(Debug, Default)]
pub struct PairingIndex {
    slots: BTreeMap<(String, ButtonRole), ProducerId>,
}

impl PairingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot. Returns false if another producer already holds it.
    pub fn claim(&mut self, axis_name: &str, role: ButtonRole, id: ProducerId) -> bool {
        let slot = self
            .slots
            .entry((axis_name.to_string(), role))
            .or_insert(id);
        if *slot != id {
            tracing::debug!(axis = %axis_name, ?role, "pairing slot already taken");
            return false;
        }
        true
    }

    /// Release the slot if `id` holds it.
    pub fn release(&mut self, axis_name: &str, role: ButtonRole, id: ProducerId) {
        let key = (axis_name.to_string(), role);
        if self.slots.get(&key) == Some(&id) {
            self.slots.remove(&key);
        }
    }

    pub fn holder(&self, axis_name: &str, role: ButtonRole) -> Option<ProducerId> {
        self.slots.get(&(axis_name.to_string(), role)).copied()
    }

    pub fn partner(&self, axis_name: &str, role: ButtonRole) -> Option<ProducerId> {
        self.slots
            .get(&(axis_name.to_string(), role.opposite()))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partner_is_opposite_role() {
        let mut index = PairingIndex::new();
        let plus = ProducerId::new();
        let minus = ProducerId::new();
        assert!(index.claim("Horizontal", ButtonRole::Positive, plus));
        assert_eq!(index.partner("Horizontal", ButtonRole::Positive), None);
        assert!(index.claim("Horizontal", ButtonRole::Negative, minus));
        assert_eq!(
            index.partner("Horizontal", ButtonRole::Positive),
            Some(minus)
        );
        assert_eq!(index.partner("Horizontal", ButtonRole::Negative), Some(plus));
    }

    #[test]
    fn first_claim_wins() {
        let mut index = PairingIndex::new();
        let first = ProducerId::new();
        let second = ProducerId::new();
        assert!(index.claim("Vertical", ButtonRole::Positive, first));
        assert!(!index.claim("Vertical", ButtonRole::Positive, second));
        assert_eq!(index.holder("Vertical", ButtonRole::Positive), Some(first));
        assert!(index.claim("Vertical", ButtonRole::Positive, first));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn release_only_by_holder() {
        let mut index = PairingIndex::new();
        let holder = ProducerId::new();
        index.claim("Vertical", ButtonRole::Negative, holder);
        index.release("Vertical", ButtonRole::Negative, ProducerId::new());
        assert_eq!(index.len(), 1);
        index.release("Vertical", ButtonRole::Negative, holder);
        assert!(index.is_empty());
    }

    #[test]
    fn different_axes_do_not_pair() {
        let mut index = PairingIndex::new();
        index.claim("Horizontal", ButtonRole::Positive, ProducerId::new());
        index.claim("Vertical", ButtonRole::Negative, ProducerId::new());
        assert_eq!(index.partner("Horizontal", ButtonRole::Positive), None);
    }
}
