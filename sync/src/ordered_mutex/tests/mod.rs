// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Multi-thread scenarios for [`OrderedMutex`]. Single-thread behavior is tested next to
//! the code.
//!
//! [`OrderedMutex`]: super::OrderedMutex


use super::*;
use std::{sync::{Arc, mpsc},
          thread::{self, JoinHandle},
          time::{Duration, Instant}};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// A thread holding the mutex until [`release()`] is called.
///
/// [`release()`]: Self::release
pub struct Holder {
    release_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl Holder {
    /// Spawns a thread that locks `mutex` in `mode`, and returns once it holds it.
    pub fn spawn(mutex: &Arc<OrderedMutex>, mode: LockMode) -> Self {
        let mutex = Arc::clone(mutex);
        let (locked_tx, locked_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            mutex.lock(mode.access, mode.share).unwrap();
            locked_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            mutex.unlock().unwrap();
        });
        locked_rx.recv_timeout(TIMEOUT).unwrap();
        Self { release_tx, handle }
    }

    pub fn release(self) {
        self.release_tx.send(()).unwrap();
        self.handle.join().unwrap();
    }
}

/// Polls until `condition` holds, panicking after [`TIMEOUT`].
pub fn wait_until(mut condition: impl FnMut() -> bool) {
    let start = Instant::now();
    while !condition() {
        assert!(start.elapsed() < TIMEOUT, "timed out waiting for condition");
        thread::sleep(Duration::from_millis(1));
    }
}
