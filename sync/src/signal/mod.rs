// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Typed, thread-safe publish/subscribe. See [`Signal`].
//!
//! # Ownership split
//!
//! ```text
//!  SignalToken ──Arc──► SignalCallbackStorage ◄──Weak── Signal (WeakSet)
//!  (subscriber owns)    callback, mode,                 (lookup only)
//!                       disconnected flag + lock
//! ```
//!
//! The token is the only strong owner of a subscription. The signal only ever holds a
//! [`Weak`] back-reference, so:
//!
//! - Dropping a token ends the subscription, even without [`disconnect()`]. The stale
//!   [`Weak`] is pruned on the next [`emit()`].
//! - Dropping the [`Signal`] marks every live subscription disconnected, which turns any
//!   async delivery still queued on the [`EventLoop`] into a no-op.
//!
//! # Delivery
//!
//! | [`ConnectionMode`] | Runs on                 | Ordering                                        |
//! | :----------------- | :---------------------- | :---------------------------------------------- |
//! | [`Direct`]         | the thread that emitted | snapshot order, before [`emit()`] returns       |
//! | [`Async`]          | the dispatcher thread   | global FIFO of the [`EventLoop`]                |
//!
//! Every delivery takes the subscription's own lock and re-checks the disconnected flag
//! right before invoking the callback. That closes the race between [`emit()`] on one
//! thread and [`disconnect()`] on another: once [`disconnect()`] returns the callback
//! will not be called again.
//!
//! [`Async`]: ConnectionMode::Async
//! [`Direct`]: ConnectionMode::Direct
//! [`EventLoop`]: crate::EventLoop
//! [`Weak`]: std::sync::Weak
//! [`disconnect()`]: Signal::disconnect
//! [`emit()`]: Signal::emit

// Attach sources.
pub mod connection_mode;
pub mod signal_callback_storage;
pub mod signal_impl;
pub mod signal_token;

// Re-export.
pub use connection_mode::*;
pub use signal_callback_storage::*;
pub use signal_impl::*;
pub use signal_token::*;
