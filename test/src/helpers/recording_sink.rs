use std::collections::HashSet;

use mindlink_client::EffectSink;
use mindlink_shared::{EntityId, EntityKey, Tick};

/// Effect sink that records every call for later assertions
#[derive(Default)]
pub struct RecordingSink {
    pub started: Vec<(EntityId, EntityId)>,
    pub released: Vec<(EntityId, EntityId)>,
    pub cooldowns: Vec<(EntityId, Tick)>,
    pub penalties: Vec<(EntityId, Tick)>,
    refused: HashSet<EntityId>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `can_commit` fail for `target`.
    pub fn refuse(&mut self, target: &EntityKey) {
        self.refused.insert(target.id());
    }

    pub fn started_targets(&self) -> Vec<EntityId> {
        self.started.iter().map(|(_, target)| *target).collect()
    }
}

impl EffectSink for RecordingSink {
    fn can_commit(&self, _agent: &EntityKey, target: &EntityKey) -> bool {
        !self.refused.contains(&target.id())
    }

    fn start_control(&mut self, agent: &EntityKey, target: &EntityKey) {
        self.started.push((agent.id(), target.id()));
    }

    fn release_control(&mut self, agent: &EntityKey, target: &EntityKey) {
        self.released.push((agent.id(), target.id()));
    }

    fn apply_cooldown(&mut self, agent: &EntityKey, ticks: Tick) {
        self.cooldowns.push((agent.id(), ticks));
    }

    fn apply_time_penalty(&mut self, agent: &EntityKey, ticks: Tick) {
        self.penalties.push((agent.id(), ticks));
    }
}
