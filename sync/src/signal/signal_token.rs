// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::SignalCallbackStorage;
use std::{fmt::{Debug, Formatter},
          sync::Arc};

/// Handle returned by [`Signal::connect()`]. It is the only strong owner of the
/// subscription.
///
/// - Keep it alive for as long as the callback should be called.
/// - Drop it (or pass it to [`Signal::disconnect()`]) to end the subscription.
///
/// Dropping is enough. The [`Signal`] notices the expired entry on its next
/// [`emit()`] and prunes it. [`Signal::disconnect()`] is only needed when the callback
/// must stop *right now*, even if a delivery is already queued on the event loop.
///
/// Deliberately not [`Clone`]: one token, one owner.
///
/// [`Signal::connect()`]: super::Signal::connect
/// [`Signal::disconnect()`]: super::Signal::disconnect
/// [`Signal`]: super::Signal
/// [`emit()`]: super::Signal::emit
#[must_use = "the subscription ends as soon as the token is dropped"]
pub struct SignalToken<Args> {
    storage: Option<Arc<SignalCallbackStorage<Args>>>,
}

impl<Args> SignalToken<Args> {
    pub(crate) fn new(storage: Arc<SignalCallbackStorage<Args>>) -> Self {
        Self {
            storage: Some(storage),
        }
    }

    pub(crate) fn storage(&self) -> Option<&Arc<SignalCallbackStorage<Args>>> {
        self.storage.as_ref()
    }

    /// `true` for a [`Default`] token that was never connected.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.storage.is_none() }

    /// `false` once the token has been passed to [`Signal::disconnect()`], or the
    /// [`Signal`] it came from has been dropped. Empty tokens are never connected.
    ///
    /// [`Signal::disconnect()`]: super::Signal::disconnect
    /// [`Signal`]: super::Signal
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.storage
            .as_ref()
            .is_some_and(|storage| !storage.is_disconnected())
    }
}

impl<Args> Default for SignalToken<Args> {
    fn default() -> Self { Self { storage: None } }
}

impl<Args> Debug for SignalToken<Args> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignalToken")
            .field("storage", &self.storage)
            .finish()
    }
}
