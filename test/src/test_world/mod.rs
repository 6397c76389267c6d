/// Minimal host simulation for selection tests: an arena that owns entity
/// lifetimes plus the attributes the candidate source reports

use std::collections::{HashMap, HashSet};

use mindlink_client::{Candidate, CandidateSource};
use mindlink_shared::{CategoryId, EntityArena, EntityId, EntityKey, Position};

#[derive(Clone, Debug)]
pub struct TestEntity {
    pub key: EntityKey,
    pub position: Position,
    pub category: CategoryId,
    pub controlled: bool,
    pub has_health_state: bool,
}

impl TestEntity {
    fn to_candidate(&self) -> Candidate {
        Candidate {
            entity: self.key.clone(),
            position: self.position,
            category: self.category,
            alive: self.key.is_alive(),
            controlled: self.controlled,
            has_health_state: self.has_health_state,
        }
    }
}

pub struct TestWorld {
    pub arena: EntityArena,
    // spawn order, so candidate enumeration is deterministic
    entities: Vec<TestEntity>,
    agents: HashMap<EntityId, Position>,
    denylist: HashSet<CategoryId>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self {
            arena: EntityArena::new(),
            entities: Vec::new(),
            agents: HashMap::new(),
            denylist: HashSet::new(),
        }
    }
}

impl TestWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_agent(&mut self, position: Position) -> EntityKey {
        let key = self.arena.spawn();
        self.agents.insert(key.id(), position);
        key
    }

    pub fn spawn(&mut self, position: Position, category: CategoryId) -> EntityKey {
        self.spawn_with(position, category, true)
    }

    pub fn spawn_with(
        &mut self,
        position: Position,
        category: CategoryId,
        has_health_state: bool,
    ) -> EntityKey {
        let key = self.arena.spawn();
        self.entities.push(TestEntity {
            key: key.clone(),
            position,
            category,
            controlled: false,
            has_health_state,
        });
        key
    }

    /// Destroys the entity in the arena and forgets its attributes.
    pub fn despawn(&mut self, key: &EntityKey) -> bool {
        self.entities.retain(|entity| entity.key != *key);
        self.agents.remove(&key.id());
        self.arena.despawn(key)
    }

    pub fn set_controlled(&mut self, key: &EntityKey, controlled: bool) {
        if let Some(entity) = self.entity_mut(key) {
            entity.controlled = controlled;
        }
    }

    pub fn move_to(&mut self, key: &EntityKey, position: Position) {
        if let Some(agent) = self.agents.get_mut(&key.id()) {
            *agent = position;
        } else if let Some(entity) = self.entity_mut(key) {
            entity.position = position;
        }
    }

    pub fn deny_category(&mut self, category: CategoryId) {
        self.denylist.insert(category);
    }

    pub fn entity(&self, key: &EntityKey) -> Option<&TestEntity> {
        self.entities.iter().find(|entity| entity.key == *key)
    }

    fn entity_mut(&mut self, key: &EntityKey) -> Option<&mut TestEntity> {
        self.entities.iter_mut().find(|entity| entity.key == *key)
    }
}

impl CandidateSource for TestWorld {
    fn live_candidates(&self) -> Vec<Candidate> {
        self.entities
            .iter()
            .filter(|entity| entity.key.is_alive())
            .map(TestEntity::to_candidate)
            .collect()
    }

    fn candidate(&self, entity: &EntityKey) -> Option<Candidate> {
        self.entity(entity).map(TestEntity::to_candidate)
    }

    fn is_denylisted(&self, candidate: &Candidate) -> bool {
        self.denylist.contains(&candidate.category)
    }

    fn agent_position(&self, agent: &EntityKey) -> Option<Position> {
        if !agent.is_alive() {
            return None;
        }
        self.agents.get(&agent.id()).copied()
    }
}
