use std::{fmt::Debug, hash::Hash, sync::Weak};

use crate::{EntityId, EntityKey};

/// A handle that observes, but does not own, some referent.
///
/// Implementors compare by identity through [`WeakKey::key_id`], never by
/// the referent's contents, and report whether the referent still exists.
/// Checking liveness must not pin the referent.
pub trait WeakKey: Clone + Send + Sync + 'static {
    type Id: Copy + Eq + Hash + Debug + Send + Sync + 'static;

    fn key_id(&self) -> Self::Id;
    fn is_alive(&self) -> bool;
}

impl WeakKey for EntityKey {
    type Id = EntityId;

    fn key_id(&self) -> EntityId {
        self.id()
    }

    fn is_alive(&self) -> bool {
        EntityKey::is_alive(self)
    }
}

// A `Weak` keeps its allocation reserved until the last weak handle drops,
// so the address cannot be reused while any registry still holds the key.
impl<T: Send + Sync + 'static> WeakKey for Weak<T> {
    type Id = usize;

    fn key_id(&self) -> usize {
        self.as_ptr() as usize
    }

    fn is_alive(&self) -> bool {
        self.strong_count() > 0
    }
}
