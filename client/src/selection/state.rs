use std::fmt;

/// Phase of a selection session.
///
/// States are ordered; a session may move to any later state, or back to
/// the state named by [`wraps_to`](SelectionState::wraps_to). Every other
/// move is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionState {
    Idle,
    Querying,
    Ready,
}

impl SelectionState {
    pub fn order(&self) -> u8 {
        match self {
            SelectionState::Idle => 0,
            SelectionState::Querying => 1,
            SelectionState::Ready => 2,
        }
    }

    pub fn wraps_to(&self) -> Option<SelectionState> {
        match self {
            SelectionState::Idle => None,
            SelectionState::Querying | SelectionState::Ready => Some(SelectionState::Idle),
        }
    }

    pub fn can_transition_to(&self, next: SelectionState) -> bool {
        next.order() > self.order() || self.wraps_to() == Some(next)
    }
}

impl fmt::Display for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SelectionState::Idle => "Idle",
            SelectionState::Querying => "Querying",
            SelectionState::Ready => "Ready",
        };
        f.write_str(name)
    }
}
