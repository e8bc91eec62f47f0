// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A fairness-ordered reader/writer lock with per-thread access and share modes. See
//! [`OrderedMutex`].
//!
//! # How admission works
//!
//! The mutex keeps four counters over its current holders (see [`LockCounters`]):
//!
//! ```text
//!                     read  write  blocking_read  blocking_write
//! Read                 +1
//! ReadWrite            +1    +1
//! Unique                              +1              +1
//! SharedReadOnly                                      +1
//! SharedReadWrite
//! ```
//!
//! [`unlock()`] subtracts exactly what [`lock()`] added. A request is admitted when:
//!
//! - its access mode isn't blocked (`Read` needs `blocking_read == 0`, `ReadWrite`
//!   needs `blocking_write == 0`), and
//! - its share mode doesn't block a holder (`Unique` needs `read == 0`,
//!   `SharedReadOnly` needs `write == 0`), and
//! - it is compatible with every older request that is still waiting.
//!
//! [`lock()`]: OrderedMutex::lock
//! [`unlock()`]: OrderedMutex::unlock

// Attach sources.
pub mod ordered_mutex_guard;
pub mod ordered_mutex_impl;
pub mod thread_mode;

// Re-export.
pub use ordered_mutex_guard::*;
pub use ordered_mutex_impl::*;
pub use thread_mode::*;

#[cfg(test)]
mod tests;
