use crossinput_common::{InputKind, ProducerId};
use crossinput_registry::{Registry, RegistryError};

/// Contract shared by every input producer.
///
/// `enable` registers (or binds to) the producer's cells; `disable` removes
/// the ones it registered. Both are idempotent.
pub trait Producer {
    fn id(&self) -> ProducerId;

    fn is_enabled(&self) -> bool;

    fn enable(&mut self, registry: &mut Registry) -> ActivationReport;

    fn disable(&mut self, registry: &mut Registry);
}

/// What happened to each cell when a producer was enabled.
///
/// Conflicts do not abort activation. They are collected here so the
/// integrator can fix the layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivationReport {
    /// Cells this producer created and registered.
    pub registered: Vec<String>,
    /// Existing cells this producer bound to instead of creating.
    pub bound: Vec<String>,
    pub conflicts: Vec<RegistryError>,
}

impl ActivationReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub(crate) fn record(&mut self, name: &str, result: Result<(), RegistryError>) {
        match result {
            Ok(()) => self.registered.push(name.to_string()),
            Err(err) => self.conflicts.push(err),
        }
    }
}

/// Errors from producer and host operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProducerError {
    #[error("producer {0:?} not found")]
    NotFound(ProducerId),
    #[error("producer {id:?} is not a {expected}")]
    WrongKind { id: ProducerId, expected: &'static str },
    #[error("producer {0:?} is not enabled")]
    NotEnabled(ProducerId),
    #[error("button handler {name:?} has no companion {kind}")]
    NoCompanion { name: String, kind: InputKind },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_records_success_and_conflict() {
        let mut report = ActivationReport::default();
        report.record("Horizontal", Ok(()));
        report.record(
            "Vertical",
            Err(RegistryError::DuplicateAxis("Vertical".into())),
        );
        assert_eq!(report.registered, vec!["Horizontal".to_string()]);
        assert_eq!(report.conflicts.len(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn empty_report_is_clean() {
        assert!(ActivationReport::default().is_clean());
    }
}
