// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// What the locking thread intends to do while it holds an [`OrderedMutex`].
///
/// [`OrderedMutex`]: super::OrderedMutex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
pub enum ThreadAccessMode {
    /// Only reads the protected data.
    Read,
    /// Reads and writes the protected data.
    ReadWrite,
}

/// What the locking thread lets *other* threads do while it holds an [`OrderedMutex`].
///
/// [`OrderedMutex`]: super::OrderedMutex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display, strum_macros::EnumIter)]
pub enum ThreadShareMode {
    /// No other thread may hold the lock in any mode.
    Unique,
    /// Others may hold it with [`ThreadAccessMode::Read`], not with
    /// [`ThreadAccessMode::ReadWrite`].
    SharedReadOnly,
    /// Others may hold it with either access mode. Provides no mutual exclusion between
    /// writers that both use this mode.
    SharedReadWrite,
}

/// The pair of modes a thread holds (or waits for) an [`OrderedMutex`] in.
///
/// [`OrderedMutex`]: super::OrderedMutex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockMode {
    pub access: ThreadAccessMode,
    pub share: ThreadShareMode,
}

impl LockMode {
    #[must_use]
    pub const fn new(access: ThreadAccessMode, share: ThreadShareMode) -> Self {
        Self { access, share }
    }

    /// The usual exclusive lock.
    pub const EXCLUSIVE: Self = Self::new(ThreadAccessMode::ReadWrite, ThreadShareMode::Unique);

    /// The usual shared (reader) lock.
    pub const SHARED: Self = Self::new(ThreadAccessMode::Read, ThreadShareMode::SharedReadOnly);

    /// Whether a thread holding `self` and another holding `other` may hold the mutex at
    /// the same time. Symmetric.
    #[must_use]
    pub fn is_compatible_with(self, other: LockMode) -> bool {
        let mut counters = LockCounters::default();
        counters.acquire(self);
        counters.admits(other)
    }
}

impl std::fmt::Display for LockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.access, self.share)
    }
}

/// Aggregate counts over every thread currently holding the mutex.
///
/// | Mode                                 | Increments                        |
/// | :----------------------------------- | :-------------------------------- |
/// | [`ThreadAccessMode::Read`]           | `read`                            |
/// | [`ThreadAccessMode::ReadWrite`]      | `read`, `write`                   |
/// | [`ThreadShareMode::Unique`]          | `blocking_read`, `blocking_write` |
/// | [`ThreadShareMode::SharedReadOnly`]  | `blocking_write`                  |
/// | [`ThreadShareMode::SharedReadWrite`] | nothing                           |
///
/// [`release()`] undoes exactly what [`acquire()`] did, and [`admits()`] is the check
/// that holds iff none of the current holders' share modes forbid the request's access
/// mode, and the request's share mode forbids none of the holders' access modes.
///
/// [`acquire()`]: Self::acquire
/// [`admits()`]: Self::admits
/// [`release()`]: Self::release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockCounters {
    pub read: usize,
    pub write: usize,
    pub blocking_read: usize,
    pub blocking_write: usize,
}

impl LockCounters {
    pub fn acquire(&mut self, mode: LockMode) {
        match mode.access {
            ThreadAccessMode::Read => self.read += 1,
            ThreadAccessMode::ReadWrite => {
                self.read += 1;
                self.write += 1;
            }
        }
        match mode.share {
            ThreadShareMode::Unique => {
                self.blocking_read += 1;
                self.blocking_write += 1;
            }
            ThreadShareMode::SharedReadOnly => self.blocking_write += 1,
            ThreadShareMode::SharedReadWrite => {}
        }
    }

    pub fn release(&mut self, mode: LockMode) {
        match mode.access {
            ThreadAccessMode::Read => self.read -= 1,
            ThreadAccessMode::ReadWrite => {
                self.read -= 1;
                self.write -= 1;
            }
        }
        match mode.share {
            ThreadShareMode::Unique => {
                self.blocking_read -= 1;
                self.blocking_write -= 1;
            }
            ThreadShareMode::SharedReadOnly => self.blocking_write -= 1,
            ThreadShareMode::SharedReadWrite => {}
        }
    }

    #[must_use]
    pub fn admits(&self, mode: LockMode) -> bool {
        let access_allowed = match mode.access {
            ThreadAccessMode::Read => self.blocking_read == 0,
            ThreadAccessMode::ReadWrite => self.blocking_write == 0,
        };
        let share_allowed = match mode.share {
            ThreadShareMode::Unique => self.read == 0,
            ThreadShareMode::SharedReadOnly => self.write == 0,
            ThreadShareMode::SharedReadWrite => true,
        };
        access_allowed && share_allowed
    }

    #[must_use]
    pub fn is_idle(&self) -> bool { *self == Self::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn all_modes() -> Vec<LockMode> {
        ThreadAccessMode::iter()
            .flat_map(|access| ThreadShareMode::iter().map(move |share| LockMode::new(access, share)))
            .collect()
    }

    #[test]
    fn test_release_undoes_acquire() {
        for mode in all_modes() {
            let mut counters = LockCounters::default();
            counters.acquire(mode);
            assert!(!counters.is_idle(), "{mode}");
            counters.release(mode);
            assert!(counters.is_idle(), "{mode}");
        }
    }

    #[test]
    fn test_idle_counters_admit_everything() {
        let counters = LockCounters::default();
        assert!(all_modes().into_iter().all(|it| counters.admits(it)));
    }

    #[test]
    fn test_compatibility_is_symmetric() {
        for a in all_modes() {
            for b in all_modes() {
                assert_eq!(a.is_compatible_with(b), b.is_compatible_with(a), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn test_exclusive_conflicts_with_everything() {
        for it in all_modes() {
            assert!(!LockMode::EXCLUSIVE.is_compatible_with(it), "{it}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(LockMode::SHARED.to_string(), "Read/SharedReadOnly");
    }
}
