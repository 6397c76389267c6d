use thiserror::Error;

use crate::SelectionState;

/// Errors that can occur while driving a selection session
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Requested state is neither later in the cycle nor the current state's
    /// wrap target
    #[error("Invalid selection transition from {from} to {to}")]
    InvalidTransition {
        from: SelectionState,
        to: SelectionState,
    },

    /// The session used up its selection time and may no longer commit
    #[error("Selection time limit exceeded, refusing transition to {to}")]
    TimeLimitExceeded { to: SelectionState },

    /// Confirm was requested with no target selected
    #[error("No target selected")]
    NothingSelected,
}
