// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Locks `mutex`, recovering the guard if a prior holder panicked.
///
/// The internal mutexes in this crate never run user code while locked (callbacks and
/// actions always run after the guard is released), so a poisoned guard can't expose a
/// half-updated invariant.
pub fn lock_ignoring_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// [`Condvar::wait()`] with the same poison recovery as [`lock_ignoring_poison()`].
pub fn wait_ignoring_poison<'a, T>(
    condition: &Condvar,
    guard: MutexGuard<'a, T>,
) -> MutexGuard<'a, T> {
    condition.wait(guard).unwrap_or_else(PoisonError::into_inner)
}
