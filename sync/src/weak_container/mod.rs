// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Non-owning containers of [`Weak`] references. See [`WeakList`] and [`WeakSet`].
//!
//! Neither container keeps its items alive. Expired entries are only reclaimed when a
//! caller walks the container with `for_each()`; there is no background sweeping.
//! Each `for_each()` pass:
//!
//! 1. Tries to [`upgrade()`] every entry.
//! 2. Evicts the entry in place if the referent is gone.
//! 3. Otherwise visits the live item and keeps the entry.
//!
//! After the pass the container holds no entry whose referent had already expired when
//! the pass started.
//!
//! [`Weak`]: std::sync::Weak
//! [`upgrade()`]: std::sync::Weak::upgrade

// Attach sources.
pub mod weak_list;
pub mod weak_set;

// Re-export.
pub use weak_list::*;
pub use weak_set::*;
