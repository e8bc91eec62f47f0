// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Arc, Weak};

/// An ordered list of [`Weak`] references. Duplicates are allowed and insertion order is
/// preserved.
///
/// [`Weak`]: std::sync::Weak
#[derive(Debug)]
pub struct WeakList<T> {
    items: Vec<Weak<T>>,
}

impl<T> WeakList<T> {
    #[must_use]
    pub fn new() -> Self { Self { items: Vec::new() } }

    /// Appends a non-owning reference to `item`.
    pub fn push(&mut self, item: &Arc<T>) { self.items.push(Arc::downgrade(item)); }

    pub fn push_weak(&mut self, item: Weak<T>) { self.items.push(item); }

    /// Number of stored entries, including ones that may have expired since the last
    /// [`for_each()`] pass.
    ///
    /// [`for_each()`]: Self::for_each
    #[must_use]
    pub fn len(&self) -> usize { self.items.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Visits every live item in insertion order and evicts expired entries in the same
    /// pass.
    pub fn for_each(&mut self, mut visit: impl FnMut(&T)) {
        self.items.retain(|weak| match weak.upgrade() {
            Some(strong) => {
                visit(&strong);
                true
            }
            None => false,
        });
    }
}

impl<T> Default for WeakList<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for WeakList<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}
