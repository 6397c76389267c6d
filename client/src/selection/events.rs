use mindlink_shared::EntityKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    /// The pool stayed empty after its one refresh
    PoolExhausted,
    TimeExceeded,
    Cancelled,
    /// Reset from outside the machine, e.g. on control loss
    ForcedReset,
}

/// Something a session did during a tick
#[derive(Clone, Debug, PartialEq)]
pub enum SelectionEvent {
    PoolBuilt { size: usize },
    Selected { targets: Vec<EntityKey> },
    Missed { entity: EntityKey },
    Committed { started: Vec<EntityKey> },
    Released { target: EntityKey },
    TimeExceeded,
    Aborted { reason: AbortReason },
}
