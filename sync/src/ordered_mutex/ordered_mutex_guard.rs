// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LockMode, OrderedMutex};
use std::marker::PhantomData;

/// An [RAII] hold on an [`OrderedMutex`], from [`OrderedMutex::lock_guard()`]. Unlocks
/// on drop.
///
/// `!Send`: the hold belongs to the thread that acquired it, so the guard must be
/// dropped on that thread.
///
/// [RAII]: https://en.wikipedia.org/wiki/Resource_acquisition_is_initialization
#[must_use = "the mutex is unlocked as soon as the guard is dropped"]
#[derive(Debug)]
pub struct OrderedMutexGuard<'a> {
    mutex: &'a OrderedMutex,
    mode: LockMode,
    _not_send: PhantomData<*const ()>,
}

impl<'a> OrderedMutexGuard<'a> {
    pub(crate) fn new(mutex: &'a OrderedMutex, mode: LockMode) -> Self {
        Self {
            mutex,
            mode,
            _not_send: PhantomData,
        }
    }

    #[must_use]
    pub fn mode(&self) -> LockMode { self.mode }
}

impl Drop for OrderedMutexGuard<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.mutex.unlock() {
            tracing::error!(message = "OrderedMutexGuard::drop() failed to unlock", error = %error);
        }
    }
}
