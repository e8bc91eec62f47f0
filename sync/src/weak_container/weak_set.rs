// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use rustc_hash::FxHashMap;
use std::sync::{Arc, Weak};

/// An unordered set of [`Weak`] references, deduplicated by the identity of the
/// allocation they point to (not by value equality of the items).
///
/// # Why an address key is sound
///
/// An entry is keyed by the address of its referent. A [`Weak`] keeps its allocation
/// (though not the value) alive, so while an entry is stored in the set no other
/// [`Arc`] can be allocated at the same address. Keys therefore can't collide with a
/// later, unrelated item.
///
/// [`Arc`]: std::sync::Arc
/// [`Weak`]: std::sync::Weak
#[derive(Debug)]
pub struct WeakSet<T> {
    items: FxHashMap<usize, Weak<T>>,
}

fn identity_of<T>(weak: &Weak<T>) -> usize { weak.as_ptr().addr() }

impl<T> WeakSet<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: FxHashMap::default(),
        }
    }

    /// Inserts a non-owning reference to `item`. Returns `false` if the same allocation
    /// is already present.
    pub fn insert(&mut self, item: &Arc<T>) -> bool { self.insert_weak(Arc::downgrade(item)) }

    pub fn insert_weak(&mut self, item: Weak<T>) -> bool {
        let key = identity_of(&item);
        if self.items.contains_key(&key) {
            return false;
        }
        self.items.insert(key, item);
        true
    }

    /// Removes the entry that refers to the same allocation as `item`. Works whether or
    /// not the referent is still alive.
    pub fn remove_weak(&mut self, item: &Weak<T>) -> bool {
        self.items.remove(&identity_of(item)).is_some()
    }

    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        self.items.remove(&Arc::as_ptr(item).addr()).is_some()
    }

    #[must_use]
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.items.contains_key(&Arc::as_ptr(item).addr())
    }

    /// Number of stored entries, including ones that may have expired since the last
    /// [`for_each()`] pass.
    ///
    /// [`for_each()`]: Self::for_each
    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Copies the weak handles (not the items) so that the set can be walked without
    /// holding whatever lock guards it.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Weak<T>> { self.items.values().cloned().collect() }

    /// Visits every live item and evicts expired entries in the same pass.
    pub fn for_each(&mut self, mut visit: impl FnMut(&T)) {
        self.items.retain(|_, weak| match weak.upgrade() {
            Some(strong) => {
                visit(&strong);
                true
            }
            None => false,
        });
    }
}

impl<T> Default for WeakSet<T> {
    fn default() -> Self { Self::new() }
}
