use mindlink_shared::{CategoryId, EntityKey, Position};

/// Snapshot of an entity the host considers eligible for selection
#[derive(Clone, Debug)]
pub struct Candidate {
    pub entity: EntityKey,
    pub position: Position,
    pub category: CategoryId,
    pub alive: bool,
    /// Already under some agent's control
    pub controlled: bool,
    pub has_health_state: bool,
}

/// Host-side view of the entities in scope. Implementations read the
/// simulation; they never hand ownership to the selection machine.
pub trait CandidateSource {
    /// Every entity in scope this tick.
    fn live_candidates(&self) -> Vec<Candidate>;

    /// Fresh attributes for `entity`, or `None` if the host no longer knows
    /// about it.
    fn candidate(&self, entity: &EntityKey) -> Option<Candidate>;

    fn is_denylisted(&self, candidate: &Candidate) -> bool;

    /// Where the controlling agent's body currently is.
    fn agent_position(&self, agent: &EntityKey) -> Option<Position>;
}
