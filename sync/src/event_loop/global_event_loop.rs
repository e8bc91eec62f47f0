// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The process wide [`EventLoop`]. See [`global_event_loop()`].

use super::EventLoop;
use std::sync::{LazyLock,
                atomic::{AtomicBool, Ordering}};

/// Set once [`GLOBAL_EVENT_LOOP`] has been built, so that shutdown doesn't build it just
/// to tear it down.
static GLOBAL_EVENT_LOOP_CREATED: AtomicBool = AtomicBool::new(false);

/// Built on first use. Rust never drops `static`s, so the dispatcher thread is stopped by
/// [`shutdown_global_event_loop()`] (usually through an [`EventLoopShutdownGuard`] held
/// in `main`).
static GLOBAL_EVENT_LOOP: LazyLock<EventLoop> = LazyLock::new(|| {
    let it = EventLoop::new();
    GLOBAL_EVENT_LOOP_CREATED.store(true, Ordering::SeqCst);
    it
});

/// Returns the process wide [`EventLoop`], spawning its thread on the first call.
///
/// This is where [`ConnectionMode::Async`] deliveries are sent.
///
/// # Panics
///
/// On first use, if the OS refuses to spawn the dispatcher thread.
///
/// [`ConnectionMode::Async`]: crate::ConnectionMode::Async
#[must_use]
pub fn global_event_loop() -> &'static EventLoop { &GLOBAL_EVENT_LOOP }

/// Stops and joins the global dispatcher thread, if it was ever started.
///
/// Idempotent: the second and later calls do nothing. After this, async deliveries are
/// silently dropped.
pub fn shutdown_global_event_loop() {
    if GLOBAL_EVENT_LOOP_CREATED.load(Ordering::SeqCst) {
        GLOBAL_EVENT_LOOP.exit();
    }
}

/// An [RAII] guard that calls [`shutdown_global_event_loop()`] when dropped.
///
/// Hold one for the lifetime of `main` so the dispatcher thread is joined exactly once
/// when the process shuts down:
///
/// ```no_run
/// fn main() {
///     let _event_loop_guard = r3bl_sync::install_shutdown_guard();
///     // ... run the application ...
/// } // Dispatcher thread joined here.
/// ```
///
/// [RAII]: https://en.wikipedia.org/wiki/Resource_acquisition_is_initialization
#[derive(Debug)]
pub struct EventLoopShutdownGuard {
    _private: (),
}

#[must_use = "the event loop is shut down as soon as the guard is dropped"]
pub fn install_shutdown_guard() -> EventLoopShutdownGuard { EventLoopShutdownGuard { _private: () } }

impl Drop for EventLoopShutdownGuard {
    fn drop(&mut self) { shutdown_global_event_loop(); }
}
