// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A single dedicated dispatcher thread that runs deferred actions in FIFO order. See
//! [`EventLoop`] and [`global_event_loop()`].
//!
//! # Architecture
//!
//! ```text
//! any thread                          dispatcher thread ("r3bl-sync-event-loop")
//! ──────────                          ───────────────────────────────────────────
//! submit(action) ──┐                  loop {
//!                  │  lock            │  lock
//!                  ├─► push_back ─────┼─► pop_front (or wait on condvar if empty)
//!                  │  notify_one      │  unlock
//!                  └─ unlock          │  run action (panics caught + logged)
//!                                     │  lock, re-check exit flag
//!                                     }
//! ```
//!
//! Actions never run in parallel with each other. The lock is released while an action
//! runs, so [`submit()`] never waits for a slow action. [`exit()`] does: it joins the
//! dispatcher, which first finishes the action it is running.
//!
//! # Lifecycle
//!
//! | State       | Entered by                                | Queue                  |
//! | :---------- | :---------------------------------------- | :--------------------- |
//! | Inert       | process start (global instance not built) | n/a                    |
//! | Running     | first [`global_event_loop()`] call        | accepting              |
//! | Terminated  | [`exit()`] / [`shutdown_global_event_loop()`] | discarded, rejecting |
//!
//! Once the exit flag is observed no further actions are popped. An action that was
//! already popped runs to completion; anything still queued is discarded.
//!
//! [`exit()`]: EventLoop::exit
//! [`submit()`]: EventLoop::submit

// Attach sources.
pub mod event_loop_impl;
pub mod global_event_loop;

// Re-export.
pub use event_loop_impl::*;
pub use global_event_loop::*;
