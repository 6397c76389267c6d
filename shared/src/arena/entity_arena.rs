use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc, PoisonError, RwLock,
};

use log::debug;

use crate::{EntityId, EntityKey};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

/// Callback fired after an entity has been despawned.
pub type DestroyListener = Arc<dyn Fn(EntityId) + Send + Sync>;

struct Slot {
    generation: u32,
    alive: bool,
}

struct SlotTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

pub(crate) struct ArenaSlots {
    arena: u32,
    table: RwLock<SlotTable>,
    listeners: RwLock<Vec<DestroyListener>>,
}

impl ArenaSlots {
    pub(crate) fn is_alive(&self, id: &EntityId) -> bool {
        if id.arena() != self.arena {
            return false;
        }
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        match table.slots.get(id.index() as usize) {
            Some(slot) => slot.alive && slot.generation == id.generation(),
            None => false,
        }
    }
}

/// Owner of entity lifetimes.
///
/// The arena plays the part of the host simulation: it is the only thing
/// that decides when an entity dies. Everything else holds [`EntityKey`]s,
/// which observe liveness without extending it. Cloning an `EntityArena`
/// yields another handle to the same slot table, so entities can be
/// despawned from any thread.
#[derive(Clone)]
pub struct EntityArena {
    slots: Arc<ArenaSlots>,
}

impl Default for EntityArena {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityArena {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(ArenaSlots {
                arena: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
                table: RwLock::new(SlotTable {
                    slots: Vec::new(),
                    free: Vec::new(),
                    live: 0,
                }),
                listeners: RwLock::new(Vec::new()),
            }),
        }
    }

    pub fn spawn(&self) -> EntityKey {
        let mut table = self
            .slots
            .table
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let (index, generation) = match table.free.pop() {
            Some(index) => {
                let slot = &mut table.slots[index as usize];
                slot.alive = true;
                (index, slot.generation)
            }
            None => {
                let index = table.slots.len() as u32;
                table.slots.push(Slot {
                    generation: 0,
                    alive: true,
                });
                (index, 0)
            }
        };
        table.live += 1;

        EntityKey::new(
            EntityId::new(self.slots.arena, index, generation),
            Arc::downgrade(&self.slots),
        )
    }

    /// Destroys the entity behind `key`. Returns `false` if it was already
    /// dead or belongs to another arena.
    pub fn despawn(&self, key: &EntityKey) -> bool {
        self.despawn_id(key.id())
    }

    pub fn despawn_id(&self, id: EntityId) -> bool {
        if id.arena() != self.slots.arena {
            return false;
        }

        {
            let mut table = self
                .slots
                .table
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(slot) = table.slots.get_mut(id.index() as usize) else {
                return false;
            };
            if !slot.alive || slot.generation != id.generation() {
                return false;
            }
            slot.alive = false;
            slot.generation = slot.generation.wrapping_add(1);
            table.free.push(id.index());
            table.live -= 1;
        }

        debug!("Entity {} despawned", id);

        // listeners run with no arena lock held, so they may query the arena
        let listeners: Vec<DestroyListener> = self
            .slots
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in listeners {
            listener(id);
        }

        true
    }

    pub fn is_alive(&self, key: &EntityKey) -> bool {
        self.slots.is_alive(&key.id())
    }

    /// Rebuilds a key for `id` if that entity is still alive.
    pub fn key(&self, id: EntityId) -> Option<EntityKey> {
        if self.slots.is_alive(&id) {
            Some(EntityKey::new(id, Arc::downgrade(&self.slots)))
        } else {
            None
        }
    }

    /// Registers a callback announcing every future despawn.
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(EntityId) + Send + Sync + 'static,
    {
        self.slots
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(listener));
    }

    pub fn len(&self) -> usize {
        self.slots
            .table
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
