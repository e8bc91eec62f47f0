// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{ConnectionMode, SignalCallbackStorage, SignalToken};
use crate::{WeakSet, global_event_loop, lock_ignoring_poison};
use std::{fmt::{Debug, Formatter},
          sync::{Arc, Mutex, PoisonError, Weak}};

/// A typed, thread-safe broadcast channel.
///
/// `Args` is the payload of one emission, usually a tuple such as `(i32, String)`. It is
/// cloned once per [`Direct`] subscriber; all [`Async`] subscribers of one emission share
/// a single [`Arc`] copy.
///
/// # Example
///
/// ```
/// use r3bl_sync::{ConnectionMode, Signal};
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// let signal = Signal::<i32>::new();
/// let total = Arc::new(AtomicI32::new(0));
///
/// let total_clone = Arc::clone(&total);
/// let token = signal.connect(
///     move |it| { total_clone.fetch_add(it, Ordering::SeqCst); },
///     ConnectionMode::Direct,
/// );
///
/// signal.emit(2);
/// signal.emit(3);
/// assert_eq!(total.load(Ordering::SeqCst), 5);
///
/// signal.disconnect(&token);
/// signal.emit(100);
/// assert_eq!(total.load(Ordering::SeqCst), 5);
/// ```
///
/// [`Async`]: ConnectionMode::Async
/// [`Direct`]: ConnectionMode::Direct
pub struct Signal<Args> {
    callbacks: Mutex<WeakSet<SignalCallbackStorage<Args>>>,
}

impl<Args> Signal<Args> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: Mutex::new(WeakSet::new()),
        }
    }

    /// Raw number of entries in the subscriber set, without pruning. May include
    /// subscriptions whose token was dropped since the last [`emit()`].
    ///
    /// [`emit()`]: Self::emit
    #[must_use]
    pub fn stored_count(&self) -> usize { lock_ignoring_poison(&self.callbacks).len() }

    /// Prunes expired entries, then returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        let mut count = 0;
        lock_ignoring_poison(&self.callbacks).for_each(|_| count += 1);
        count
    }
}

impl<Args> Signal<Args>
where
    Args: Clone + Send + Sync + 'static,
{
    /// Subscribes `callback`. The subscription lives as long as the returned
    /// [`SignalToken`].
    pub fn connect(
        &self,
        callback: impl Fn(Args) + Send + Sync + 'static,
        mode: ConnectionMode,
    ) -> SignalToken<Args> {
        let storage = Arc::new(SignalCallbackStorage::new(Box::new(callback), mode));
        lock_ignoring_poison(&self.callbacks).insert(&storage);
        SignalToken::new(storage)
    }

    /// Shorthand for [`connect()`] with [`ConnectionMode::Direct`].
    ///
    /// [`connect()`]: Self::connect
    pub fn connect_direct(
        &self,
        callback: impl Fn(Args) + Send + Sync + 'static,
    ) -> SignalToken<Args> {
        self.connect(callback, ConnectionMode::Direct)
    }

    /// Ends the subscription owned by `token`.
    ///
    /// - Once this returns, the callback is never called again, including async
    ///   deliveries already queued on the event loop.
    /// - If a delivery to this subscription is running on another thread, this waits for
    ///   it to finish.
    /// - Calling it from inside the subscription's own callback is allowed.
    /// - No-op for an empty token, or one that was already disconnected.
    pub fn disconnect(&self, token: &SignalToken<Args>) {
        let Some(storage) = token.storage() else {
            return;
        };

        // The storage lock and the signal lock are never held together, so a callback
        // that is running under its storage lock may still connect or disconnect.
        storage.mark_disconnected();
        lock_ignoring_poison(&self.callbacks).remove(storage);
    }

    /// Delivers `args` to every live subscription.
    ///
    /// [`Direct`] subscribers run on this thread, in snapshot order, before this returns.
    /// [`Async`] subscribers are queued on the [`global_event_loop()`]. A panicking
    /// callback is logged and skipped; it never escapes this call.
    ///
    /// Subscriptions added or removed by a callback during this call don't affect who
    /// receives *this* emission (beyond the disconnected check made right before each
    /// delivery).
    ///
    /// [`Async`]: ConnectionMode::Async
    /// [`Direct`]: ConnectionMode::Direct
    pub fn emit(&self, args: Args) {
        let snapshot = lock_ignoring_poison(&self.callbacks).snapshot();

        let mut expired: Vec<Weak<SignalCallbackStorage<Args>>> = vec![];
        let mut async_args: Option<Arc<Args>> = None;

        for weak in snapshot {
            let Some(storage) = weak.upgrade() else {
                expired.push(weak);
                continue;
            };

            match storage.mode {
                ConnectionMode::Direct => storage.invoke(args.clone()),
                ConnectionMode::Async => {
                    let shared_args =
                        Arc::clone(async_args.get_or_insert_with(|| Arc::new(args.clone())));
                    // Only the weak handle travels to the event loop; a token dropped in
                    // the meantime turns this delivery into a no-op.
                    drop(storage);
                    global_event_loop().submit(move || {
                        if let Some(storage) = weak.upgrade() {
                            storage.invoke(Args::clone(&shared_args));
                        }
                    });
                }
            }
        }

        if !expired.is_empty() {
            let mut callbacks = lock_ignoring_poison(&self.callbacks);
            for it in &expired {
                callbacks.remove_weak(it);
            }
            drop(callbacks);
            tracing::trace!(
                message = "Signal::emit() pruned expired subscriptions",
                count = expired.len()
            );
        }
    }
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self { Self::new() }
}

/// Marks every live subscription disconnected, so that async deliveries still queued on
/// the event loop become no-ops. Entries are not removed; the tokens still own them.
impl<Args> Drop for Signal<Args> {
    fn drop(&mut self) {
        self.callbacks
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .for_each(|storage| storage.mark_disconnected());
    }
}

impl<Args> Debug for Signal<Args> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("stored_count", &self.stored_count())
            .finish_non_exhaustive()
    }
}
