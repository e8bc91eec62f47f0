// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{LockCounters, LockMode, OrderedMutexGuard, ThreadAccessMode, ThreadShareMode};
use crate::{SyncError, lock_ignoring_poison, wait_ignoring_poison};
use rustc_hash::FxHashMap;
use std::{collections::VecDeque,
          sync::{Condvar, Mutex},
          thread::{self, ThreadId}};

/// A thread that called [`OrderedMutex::lock()`] and has not been admitted yet.
#[derive(Debug, Clone, Copy)]
pub(crate) struct QueueEntry {
    thread_id: ThreadId,
    mode: LockMode,
}

/// Bookkeeping guarded by [`OrderedMutex`]'s internal lock.
#[derive(Debug, Default)]
pub(crate) struct OrderedMutexState {
    /// Every thread that holds the mutex (`Some`) or is waiting for it (`None`).
    threads: FxHashMap<ThreadId, Option<LockMode>>,
    /// Waiting threads, oldest first.
    queue: VecDeque<QueueEntry>,
    /// Totals over the holders only.
    counters: LockCounters,
}

impl OrderedMutexState {
    /// Compatible with every holder, and with every waiter that arrived before
    /// `thread_id`. A waiter never overtakes an older waiter it conflicts with.
    fn is_admissible(&self, thread_id: ThreadId, mode: LockMode) -> bool {
        self.counters.admits(mode)
            && self
                .queue
                .iter()
                .take_while(|it| it.thread_id != thread_id)
                .all(|it| it.mode.is_compatible_with(mode))
    }

    fn grant(&mut self, thread_id: ThreadId, mode: LockMode) {
        self.queue.retain(|it| it.thread_id != thread_id);
        self.threads.insert(thread_id, Some(mode));
        self.counters.acquire(mode);
    }
}

/// A reader/writer lock with per-thread modes, FIFO fairness among waiters, and
/// same-thread deadlock detection.
///
/// Each holder declares two things:
/// 1. A [`ThreadAccessMode`]: what it is going to do with the data.
/// 2. A [`ThreadShareMode`]: what it allows other threads to do at the same time.
///
/// Two requests may hold the mutex together only if each one's share mode permits the
/// other's access mode:
///
/// | holder \ request     | RW, Unique | R, SharedRO | R, SharedRW | RW, SharedRW |
/// | :------------------- | :--------- | :---------- | :---------- | :----------- |
/// | RW, Unique           | serial     | serial      | serial      | serial       |
/// | R, SharedReadOnly    | serial     | parallel    | parallel    | serial       |
/// | R, SharedReadWrite   | serial     | parallel    | parallel    | parallel     |
/// | RW, SharedReadWrite  | serial     | serial      | parallel    | parallel     |
///
/// # Fairness
///
/// Waiters queue up in arrival order. A waiter is admitted only once it is compatible
/// with every current holder *and* every older waiter. So with two readers holding the
/// lock and a writer waiting, a third reader waits for the writer instead of starving it.
///
/// # Ownership is per thread
///
/// The lock is held by the calling *thread*, not by a value. [`unlock()`] must be called
/// from the thread that called [`lock()`]. [`lock_guard()`] returns a guard that does
/// this on drop (and is `!Send` so it can't wander off to another thread).
///
/// The mutex guards no data of its own. Pair it with the data it protects, e.g. in a
/// struct next to an [`UnsafeCell`] or with atomics.
///
/// [`UnsafeCell`]: std::cell::UnsafeCell
/// [`lock()`]: Self::lock
/// [`lock_guard()`]: Self::lock_guard
/// [`unlock()`]: Self::unlock
#[derive(Debug, Default)]
pub struct OrderedMutex {
    state: Mutex<OrderedMutexState>,
    condition: Condvar,
}

impl OrderedMutex {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Blocks until this thread may hold the mutex in the given modes.
    ///
    /// # Errors
    ///
    /// [`SyncError::Deadlock`] if this thread already holds the mutex, in any mode.
    /// Waiting would never end, so this returns immediately instead.
    pub fn lock(
        &self,
        access: ThreadAccessMode,
        share: ThreadShareMode,
    ) -> Result<(), SyncError> {
        let mode = LockMode::new(access, share);
        let thread_id = thread::current().id();

        let mut state = lock_ignoring_poison(&self.state);
        if state.threads.contains_key(&thread_id) {
            return Err(SyncError::Deadlock);
        }

        state.threads.insert(thread_id, None);
        state.queue.push_back(QueueEntry { thread_id, mode });

        while !state.is_admissible(thread_id, mode) {
            state = wait_ignoring_poison(&self.condition, state);
        }

        state.grant(thread_id, mode);
        Ok(())
    }

    /// Like [`lock()`] but never waits. Returns `Ok(false)` if the mutex can't be held in
    /// the given modes right now (a conflicting holder, or an older conflicting waiter).
    ///
    /// # Errors
    ///
    /// [`SyncError::Deadlock`] if this thread already holds the mutex.
    ///
    /// [`lock()`]: Self::lock
    pub fn try_lock(
        &self,
        access: ThreadAccessMode,
        share: ThreadShareMode,
    ) -> Result<bool, SyncError> {
        let mode = LockMode::new(access, share);
        let thread_id = thread::current().id();

        let mut state = lock_ignoring_poison(&self.state);
        if state.threads.contains_key(&thread_id) {
            return Err(SyncError::Deadlock);
        }

        // Not queued, so every waiter counts as older.
        let admissible = state.counters.admits(mode)
            && state.queue.iter().all(|it| it.mode.is_compatible_with(mode));
        if admissible {
            state.grant(thread_id, mode);
        }
        Ok(admissible)
    }

    /// Releases the mutex held by this thread and wakes every waiter to re-check.
    ///
    /// # Errors
    ///
    /// [`SyncError::NotLocked`] if this thread doesn't hold the mutex.
    pub fn unlock(&self) -> Result<(), SyncError> {
        let thread_id = thread::current().id();

        let mut state = lock_ignoring_poison(&self.state);
        let Some(Some(mode)) = state.threads.get(&thread_id).copied() else {
            return Err(SyncError::NotLocked { what: "mutex" });
        };

        state.threads.remove(&thread_id);
        state.counters.release(mode);
        drop(state);

        self.condition.notify_all();
        Ok(())
    }

    /// [`lock()`] and return a guard that calls [`unlock()`] when dropped.
    ///
    /// # Errors
    ///
    /// Same as [`lock()`].
    ///
    /// [`lock()`]: Self::lock
    /// [`unlock()`]: Self::unlock
    pub fn lock_guard(
        &self,
        access: ThreadAccessMode,
        share: ThreadShareMode,
    ) -> Result<OrderedMutexGuard<'_>, SyncError> {
        self.lock(access, share)?;
        Ok(OrderedMutexGuard::new(self, LockMode::new(access, share)))
    }

    /// The modes this thread holds the mutex in, if any.
    #[must_use]
    pub fn held_mode(&self) -> Option<LockMode> {
        let thread_id = thread::current().id();
        lock_ignoring_poison(&self.state)
            .threads
            .get(&thread_id)
            .copied()
            .flatten()
    }

    #[must_use]
    pub fn is_locked_by_current_thread(&self) -> bool { self.held_mode().is_some() }

    /// Number of threads blocked in [`lock()`].
    ///
    /// [`lock()`]: Self::lock
    #[must_use]
    pub fn waiting_count(&self) -> usize { lock_ignoring_poison(&self.state).queue.len() }

    /// Number of threads currently holding the mutex.
    #[must_use]
    pub fn holder_count(&self) -> usize {
        lock_ignoring_poison(&self.state)
            .threads
            .values()
            .filter(|it| it.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lock_then_unlock() {
        let mutex = OrderedMutex::new();
        assert!(!mutex.is_locked_by_current_thread());

        mutex
            .lock(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique)
            .unwrap();
        assert!(mutex.is_locked_by_current_thread());
        assert_eq!(mutex.held_mode(), Some(LockMode::EXCLUSIVE));
        assert_eq!(mutex.holder_count(), 1);

        mutex.unlock().unwrap();
        assert!(!mutex.is_locked_by_current_thread());
        assert_eq!(mutex.holder_count(), 0);
        assert!(lock_ignoring_poison(&mutex.state).counters.is_idle());
    }

    #[test]
    fn test_relock_same_thread_is_deadlock() {
        let mutex = OrderedMutex::new();
        mutex
            .lock(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique)
            .unwrap();

        let result = mutex.lock(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique);
        assert!(matches!(result, Err(SyncError::Deadlock)));

        // Even a mode that would be compatible with another thread's hold.
        let result = mutex.try_lock(ThreadAccessMode::Read, ThreadShareMode::SharedReadWrite);
        assert!(matches!(result, Err(SyncError::Deadlock)));

        // The first hold is unaffected.
        assert_eq!(mutex.held_mode(), Some(LockMode::EXCLUSIVE));
        mutex.unlock().unwrap();
    }

    #[test]
    fn test_relock_shared_same_thread_is_deadlock() {
        let mutex = OrderedMutex::new();
        mutex
            .lock(ThreadAccessMode::Read, ThreadShareMode::SharedReadWrite)
            .unwrap();
        let result = mutex.lock(ThreadAccessMode::Read, ThreadShareMode::SharedReadWrite);
        assert!(matches!(result, Err(SyncError::Deadlock)));
        mutex.unlock().unwrap();
    }

    #[test]
    fn test_unlock_without_lock_is_not_locked() {
        let mutex = OrderedMutex::new();
        let result = mutex.unlock();
        assert!(matches!(result, Err(SyncError::NotLocked { what: "mutex" })));

        mutex
            .lock(ThreadAccessMode::Read, ThreadShareMode::SharedReadOnly)
            .unwrap();
        mutex.unlock().unwrap();
        assert!(matches!(mutex.unlock(), Err(SyncError::NotLocked { .. })));
    }

    #[test]
    fn test_guard_unlocks_on_drop() {
        let mutex = OrderedMutex::new();
        {
            let guard = mutex
                .lock_guard(ThreadAccessMode::Read, ThreadShareMode::SharedReadOnly)
                .unwrap();
            assert_eq!(guard.mode(), LockMode::SHARED);
            assert!(mutex.is_locked_by_current_thread());
        }
        assert!(!mutex.is_locked_by_current_thread());
        mutex
            .lock(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique)
            .unwrap();
        mutex.unlock().unwrap();
    }

    #[test]
    fn test_guard_reports_deadlock() {
        let mutex = OrderedMutex::new();
        let _guard = mutex
            .lock_guard(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique)
            .unwrap();
        let result = mutex.lock_guard(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique);
        assert!(matches!(result, Err(SyncError::Deadlock)));
    }
}
