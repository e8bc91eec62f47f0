// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_sync
//!
//! A small concurrency toolkit for applications that need in-process broadcast of
//! events and multi-mode critical sections. It provides:
//!
//! 1. [`Signal`] - a typed, thread-safe publish/subscribe channel. Subscribing returns a
//!    [`SignalToken`] which *owns* the subscription; the signal only keeps a [`Weak`]
//!    back-reference, so dropping a token is enough to end a subscription. Each
//!    subscriber picks a [`ConnectionMode`]:
//!    - [`ConnectionMode::Direct`] runs the callback on the emitting thread.
//!    - [`ConnectionMode::Async`] defers the callback to the [`EventLoop`].
//! 2. [`EventLoop`] - one dedicated dispatcher thread per process draining a FIFO queue
//!    of deferred actions. The global instance is created lazily by
//!    [`global_event_loop()`].
//! 3. [`OrderedMutex`] - a fairness-ordered reader/writer lock. Each holder declares a
//!    [`ThreadAccessMode`] (what it will do) and a [`ThreadShareMode`] (what it lets
//!    others do concurrently). Re-acquiring from the same thread returns
//!    [`SyncError::Deadlock`] instead of hanging.
//! 4. [`WeakList`] and [`WeakSet`] - non-owning containers with lazy pruning of expired
//!    entries. These back the signal's subscriber set.
//!
//! Supporting pieces:
//!
//! - [`log`](mod@log) - a leveled logging facade that is itself just a [`Signal`] of
//!   [`LogRecord`]s, plus [`TracingConfig`] to install [`tracing`] subscribers.
//! - [`lock_file`](mod@lock_file) - an exclusive, non-blocking lock file for single instance
//!   enforcement (unix).
//! - [`error`](mod@error) - [`SyncError`] and [`TaskCancelled`].
//!
//! # Panics in user code
//!
//! A panic inside a subscriber callback or a deferred action never escapes [`emit()`],
//! [`disconnect()`], or the dispatcher thread. It is caught where the callback is invoked
//! and reported at [`ERROR`] level through the [`logger()`].
//!
//! [`Weak`]: std::sync::Weak
//! [`emit()`]: Signal::emit
//! [`disconnect()`]: Signal::disconnect

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod common;
pub mod error;
pub mod event_loop;
#[cfg(unix)]
pub mod lock_file;
pub mod log;
pub mod ordered_mutex;
pub mod signal;
pub mod weak_container;

#[cfg(test)]
pub mod test_fixtures;

// Re-export stable public API for a flat API surface.
pub use common::*;
pub use error::*;
pub use event_loop::*;
#[cfg(unix)]
pub use lock_file::*;
pub use log::*;
pub use ordered_mutex::*;
pub use signal::*;
pub use weak_container::*;
