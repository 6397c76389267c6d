use log::debug;

use crate::{WeakKey, WeakListError};

/// Index-addressable list of weak handles.
///
/// Slots keep their position when the referent dies, leaving a hole that
/// [`at`](WeakList::at) reports as `None` until the next
/// [`shrink`](WeakList::shrink). Membership is by identity.
pub struct WeakList<T: WeakKey> {
    items: Vec<T>,
}

impl<T: WeakKey> Default for WeakList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: WeakKey> WeakList<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Appends `item` unless it is already dead or already listed.
    pub fn push(&mut self, item: T) -> bool {
        if !item.is_alive() {
            debug!("WeakList ignoring dead item {:?}", item.key_id());
            return false;
        }
        if self.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn try_at(&self, index: usize) -> Result<T, WeakListError> {
        let Some(item) = self.items.get(index) else {
            return Err(WeakListError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        };
        if !item.is_alive() {
            return Err(WeakListError::DeadReference { index });
        }
        Ok(item.clone())
    }

    /// The live item at `index`, or `None` for a hole or an index past the
    /// end.
    pub fn at(&self, index: usize) -> Option<T> {
        self.try_at(index).ok()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.position(item).is_some()
    }

    /// Index of `item`, if it is listed and still alive.
    pub fn position(&self, item: &T) -> Option<usize> {
        let id = item.key_id();
        self.items
            .iter()
            .position(|listed| listed.key_id() == id)
            .filter(|index| self.items[*index].is_alive())
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn remove(&mut self, item: &T) -> bool {
        let id = item.key_id();
        let before = self.items.len();
        self.items.retain(|listed| listed.key_id() != id);
        self.items.len() != before
    }

    /// Keeps live items for which `predicate` holds. Dead items are always
    /// dropped.
    pub fn retain<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.items.retain(|item| item.is_alive() && predicate(item));
    }

    /// Drops every hole. Returns how many were dropped.
    pub fn shrink(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.is_alive());
        before - self.items.len()
    }

    pub fn iter_live(&self) -> impl Iterator<Item = &T> {
        self.items.iter().filter(|item| item.is_alive())
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter_live().cloned().collect()
    }

    /// Slot count, holes included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn live_len(&self) -> usize {
        self.iter_live().count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T: WeakKey> FromIterator<T> for WeakList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for item in iter {
            list.push(item);
        }
        list
    }
}
