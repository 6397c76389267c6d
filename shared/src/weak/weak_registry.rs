use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError, Weak},
};

use log::debug;

use crate::WeakKey;

// below this many slots, tombstones are cheaper to keep than to compact away
const COMPACT_MIN_SLOTS: usize = 16;

struct WeakEntry<K, V> {
    key: K,
    value: V,
}

struct RegistryInner<K: WeakKey, V> {
    // insertion order; `None` is a tombstone left by a removal
    entries: Vec<Option<WeakEntry<K, V>>>,
    slots: HashMap<K::Id, usize>,
    live: usize,
}

impl<K: WeakKey, V> RegistryInner<K, V> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: HashMap::new(),
            live: 0,
        }
    }

    fn vacate(&mut self, slot: usize) -> Option<WeakEntry<K, V>> {
        let entry = self.entries.get_mut(slot)?.take()?;
        self.slots.remove(&entry.key.key_id());
        self.live -= 1;
        Some(entry)
    }

    fn vacate_id(&mut self, id: &K::Id) -> Option<WeakEntry<K, V>> {
        let slot = *self.slots.get(id)?;
        self.vacate(slot)
    }

    /// Slot of `key` if present and alive. A dead entry found on the way is
    /// purged and reported as absent.
    fn live_slot(&mut self, key: &K) -> Option<usize> {
        let slot = *self.slots.get(&key.key_id())?;
        let alive = match &self.entries[slot] {
            Some(entry) => entry.key.is_alive(),
            None => false,
        };
        if alive {
            Some(slot)
        } else {
            debug!("WeakRegistry purging dead key {:?} on lookup", key.key_id());
            self.vacate(slot);
            None
        }
    }

    fn sweep(&mut self) -> usize {
        let mut purged = 0;
        for slot in 0..self.entries.len() {
            let dead = match &self.entries[slot] {
                Some(entry) => !entry.key.is_alive(),
                None => false,
            };
            if dead {
                self.vacate(slot);
                purged += 1;
            }
        }
        purged
    }

    fn compact(&mut self, force: bool) {
        let tombstones = self.entries.len() - self.live;
        if tombstones == 0 {
            return;
        }
        if !force && (self.entries.len() < COMPACT_MIN_SLOTS || tombstones * 2 < self.entries.len())
        {
            return;
        }

        self.entries.retain(Option::is_some);
        self.slots.clear();
        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some(entry) = entry {
                self.slots.insert(entry.key.key_id(), slot);
            }
        }
    }

    fn visit<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        for slot in 0..self.entries.len() {
            let keep = match &mut self.entries[slot] {
                Some(entry) => {
                    // liveness is re-checked right before yielding, so a key
                    // destroyed mid-iteration is skipped rather than visited
                    if entry.key.is_alive() {
                        visitor(&entry.key, &mut entry.value)
                    } else {
                        false
                    }
                }
                None => continue,
            };
            if !keep {
                self.vacate(slot);
            }
        }
        self.compact(false);
    }
}

/// Identity-keyed map that never extends the lifetime of its keys.
///
/// Entries whose key has been destroyed by its owner read as absent and are
/// purged lazily: on lookup, during iteration, or on an explicit
/// [`shrink`](WeakRegistry::shrink). Enumeration follows insertion order.
///
/// All operations go through one mutex, which also guards
/// [`notify_destroyed`](WeakRegistry::notify_destroyed), so a destroy
/// notification from another thread cannot interleave with an insert or a
/// removal. Clones share the same underlying storage. No lock is held once a
/// method returns.
pub struct WeakRegistry<K: WeakKey, V> {
    inner: Arc<Mutex<RegistryInner<K, V>>>,
}

impl<K: WeakKey, V> Clone for WeakRegistry<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: WeakKey, V> Default for WeakRegistry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: WeakKey, V> WeakRegistry<K, V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(RegistryInner::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner<K, V>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `value` for `key`, overwriting any value already stored for
    /// the same identity. A key that is already dead is ignored.
    pub fn set(&self, key: K, value: V) {
        let mut inner = self.lock();

        // checked under the lock: a destroy announcement that already ran
        // must not be undone by a late insert
        if !key.is_alive() {
            debug!("WeakRegistry ignoring set for dead key {:?}", key.key_id());
            return;
        }

        let id = key.key_id();
        if let Some(&slot) = inner.slots.get(&id) {
            if let Some(entry) = inner.entries[slot].as_mut() {
                entry.key = key;
                entry.value = value;
                return;
            }
        }

        let slot = inner.entries.len();
        inner.entries.push(Some(WeakEntry { key, value }));
        inner.slots.insert(id, slot);
        inner.live += 1;
    }

    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.with(key, V::clone)
    }

    /// Runs `reader` against the value for `key`, if the key is alive.
    pub fn with<R, F>(&self, key: &K, reader: F) -> Option<R>
    where
        F: FnOnce(&V) -> R,
    {
        let mut inner = self.lock();
        let slot = inner.live_slot(key)?;
        inner.entries[slot]
            .as_ref()
            .map(|entry| reader(&entry.value))
    }

    pub fn with_mut<R, F>(&self, key: &K, writer: F) -> Option<R>
    where
        F: FnOnce(&mut V) -> R,
    {
        let mut inner = self.lock();
        let slot = inner.live_slot(key)?;
        inner.entries[slot]
            .as_mut()
            .map(|entry| writer(&mut entry.value))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.lock().live_slot(key).is_some()
    }

    /// Removes `key`. Returns whether a live entry was removed; removing an
    /// absent or dead key is a no-op that returns `false`.
    pub fn remove(&self, key: &K) -> bool {
        self.take(key).is_some()
    }

    /// Removes `key` and hands back its value.
    pub fn take(&self, key: &K) -> Option<V> {
        let mut inner = self.lock();
        let slot = inner.live_slot(key)?;
        let entry = inner.vacate(slot);
        inner.compact(false);
        entry.map(|entry| entry.value)
    }

    /// Owner-side announcement that the referent with identity `id` has been
    /// destroyed. Idempotent: returns `false` if nothing was stored for it.
    pub fn notify_destroyed(&self, id: K::Id) -> bool {
        let mut inner = self.lock();
        let removed = inner.vacate_id(&id).is_some();
        if removed {
            debug!("WeakRegistry dropped entry for destroyed key {:?}", id);
            inner.compact(false);
        }
        removed
    }

    /// Returns a callback that forwards destroy announcements to this
    /// registry. The callback holds the registry weakly and does nothing
    /// once every registry handle has been dropped.
    pub fn destroy_listener(&self) -> impl Fn(K::Id) + Send + Sync + 'static
    where
        V: Send + 'static,
    {
        let inner: Weak<Mutex<RegistryInner<K, V>>> = Arc::downgrade(&self.inner);
        move |id| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let mut inner = inner.lock().unwrap_or_else(PoisonError::into_inner);
            if inner.vacate_id(&id).is_some() {
                inner.compact(false);
            }
        }
    }

    /// Visits every live entry in insertion order, purging dead ones.
    ///
    /// The registry lock is held while `visitor` runs; it must not call back
    /// into this registry.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, &V),
    {
        self.lock().visit(|key, value| {
            visitor(key, value);
            true
        });
    }

    /// Keeps only live entries for which `predicate` returns `true`. Same
    /// locking caveat as [`for_each`](WeakRegistry::for_each).
    pub fn retain<F>(&self, predicate: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        self.lock().visit(predicate);
    }

    /// Live entries in insertion order. Shrinks first.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let mut inner = self.lock();
        inner.sweep();
        inner.compact(true);
        inner
            .entries
            .iter()
            .flatten()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }

    pub fn keys(&self) -> Vec<K> {
        let mut inner = self.lock();
        inner.sweep();
        inner.compact(true);
        inner
            .entries
            .iter()
            .flatten()
            .map(|entry| entry.key.clone())
            .collect()
    }

    /// Full live/dead sweep. Returns how many dead entries were purged.
    pub fn shrink(&self) -> usize {
        let mut inner = self.lock();
        let purged = inner.sweep();
        inner.compact(true);
        if purged > 0 {
            debug!("WeakRegistry shrink purged {} dead entries", purged);
        }
        purged
    }

    /// Count of live entries, after a shrink.
    pub fn len(&self) -> usize {
        let mut inner = self.lock();
        inner.sweep();
        inner.compact(false);
        inner.live
    }

    /// Count of entries believed live, without sweeping. May over-report
    /// keys destroyed since the last purge, never under-report.
    pub fn len_hint(&self) -> usize {
        self.lock().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.slots.clear();
        inner.live = 0;
    }
}
