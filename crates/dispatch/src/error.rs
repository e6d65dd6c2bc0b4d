use crossinput_common::InputKind;

/// Errors from dispatch queries and scripted writes.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DispatchError {
    /// The consumer asked for a name nothing provides. This is a
    /// configuration bug on the caller's side.
    #[error("{kind} {name:?} is neither a virtual input nor bound by the hardware service")]
    Unresolved { kind: InputKind, name: String },
    #[error("{kind} {name:?} has no virtual cell and hardware input cannot be written")]
    NotSettable { kind: InputKind, name: String },
}

impl DispatchError {
    pub(crate) fn unresolved(kind: InputKind, name: &str) -> Self {
        Self::Unresolved {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn not_settable(kind: InputKind, name: &str) -> Self {
        Self::NotSettable {
            kind,
            name: name.to_string(),
        }
    }
}
