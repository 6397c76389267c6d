use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Weak,
};

use crate::arena::entity_arena::ArenaSlots;

/// Generation-tagged identity of an entity spawned by an [`EntityArena`].
///
/// Two ids are equal only if they come from the same arena, the same slot
/// and the same generation of that slot, so a recycled slot never aliases
/// an entity that used to live there.
///
/// [`EntityArena`]: crate::EntityArena
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    arena: u32,
    index: u32,
    generation: u32,
}

impl EntityId {
    pub(crate) fn new(arena: u32, index: u32, generation: u32) -> Self {
        Self {
            arena,
            index,
            generation,
        }
    }

    pub fn arena(&self) -> u32 {
        self.arena
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}v{}", self.arena, self.index, self.generation)
    }
}

/// Non-owning handle to an arena entity.
///
/// Holding an `EntityKey` never keeps the entity alive: liveness is a
/// generation check against the arena's slot table, and a key whose arena
/// has been dropped reads as dead.
#[derive(Clone)]
pub struct EntityKey {
    id: EntityId,
    slots: Weak<ArenaSlots>,
}

impl EntityKey {
    pub(crate) fn new(id: EntityId, slots: Weak<ArenaSlots>) -> Self {
        Self { id, slots }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn is_alive(&self) -> bool {
        match self.slots.upgrade() {
            Some(slots) => slots.is_alive(&self.id),
            None => false,
        }
    }
}

impl PartialEq for EntityKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for EntityKey {}

impl Hash for EntityKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityKey").field(&self.id).finish()
    }
}
