// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::ConnectionMode;
use crate::{log::log_caught_panic, panic_payload_message};
use parking_lot::ReentrantMutex;
use std::{cell::Cell,
          fmt::{Debug, Formatter},
          panic::{AssertUnwindSafe, catch_unwind}};

/// Boxed subscriber callback.
pub type SignalCallback<Args> = Box<dyn Fn(Args) + Send + Sync + 'static>;

/// The state of one subscription: its callback, its [`ConnectionMode`], and the
/// disconnected flag.
///
/// Owned by exactly one [`SignalToken`] (via [`Arc`]); the [`Signal`] only holds a
/// [`Weak`] to it.
///
/// # Why a reentrant lock?
///
/// The flag lives inside a [`ReentrantMutex`] that is held for the whole duration of a
/// delivery. A [`Direct`] callback may call [`Signal::disconnect()`] on its own token
/// from inside the callback. That call needs the same lock on the same thread, which a
/// plain mutex would turn into a self-deadlock.
///
/// [`Arc`]: std::sync::Arc
/// [`Direct`]: ConnectionMode::Direct
/// [`Signal::disconnect()`]: super::Signal::disconnect
/// [`SignalToken`]: super::SignalToken
/// [`Signal`]: super::Signal
/// [`Weak`]: std::sync::Weak
pub struct SignalCallbackStorage<Args> {
    pub callback: SignalCallback<Args>,
    pub mode: ConnectionMode,
    disconnected: ReentrantMutex<Cell<bool>>,
}

impl<Args> SignalCallbackStorage<Args> {
    #[must_use]
    pub fn new(callback: SignalCallback<Args>, mode: ConnectionMode) -> Self {
        Self {
            callback,
            mode,
            disconnected: ReentrantMutex::new(Cell::new(false)),
        }
    }

    /// Sets the disconnected flag. Blocks while a delivery to this subscription is in
    /// progress on another thread.
    pub fn mark_disconnected(&self) { self.disconnected.lock().set(true); }

    #[must_use]
    pub fn is_disconnected(&self) -> bool { self.disconnected.lock().get() }

    /// Calls the callback with `args`, unless this subscription has been disconnected.
    ///
    /// The lock is held across the call. A panic in the callback is caught and logged,
    /// it never propagates to the caller.
    pub fn invoke(&self, args: Args) {
        let disconnected = self.disconnected.lock();
        if disconnected.get() {
            // Disconnected between the emit() snapshot and this delivery.
            return;
        }

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| (self.callback)(args))) {
            log_caught_panic(
                &format!("Error in {} signal callback", self.mode),
                panic_payload_message(payload.as_ref()),
            );
        }

        drop(disconnected);
    }
}

impl<Args> Debug for SignalCallbackStorage<Args> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalCallbackStorage")
            .field("mode", &self.mode)
            .field("disconnected", &self.is_disconnected())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc,
                    atomic::{AtomicUsize, Ordering}};

    #[test]
    fn test_invoke_until_disconnected() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let storage = SignalCallbackStorage::new(
            Box::new(move |it: usize| {
                count_clone.fetch_add(it, Ordering::SeqCst);
            }),
            ConnectionMode::Direct,
        );

        storage.invoke(2);
        storage.invoke(3);
        assert_eq!(count.load(Ordering::SeqCst), 5);

        storage.mark_disconnected();
        assert!(storage.is_disconnected());
        storage.invoke(100);
        assert_eq!(count.load(Ordering::SeqCst), 5);
    }

    fn panicking_callback((): ()) { panic!("deliberate panic in callback"); }

    #[test]
    fn test_invoke_contains_panic() {
        let storage = SignalCallbackStorage::new(Box::new(panicking_callback), ConnectionMode::Direct);
        storage.invoke(());
        // Still usable afterwards.
        storage.invoke(());
        assert!(!storage.is_disconnected());
    }

    #[test]
    fn test_disconnect_from_inside_callback() {
        let storage = Arc::new_cyclic(|weak: &std::sync::Weak<SignalCallbackStorage<()>>| {
            let weak = weak.clone();
            SignalCallbackStorage::new(
                Box::new(move |()| {
                    if let Some(it) = weak.upgrade() {
                        // Same thread already holds the lock, must not deadlock.
                        it.mark_disconnected();
                    }
                }),
                ConnectionMode::Direct,
            )
        });

        storage.invoke(());
        assert!(storage.is_disconnected());
    }
}
