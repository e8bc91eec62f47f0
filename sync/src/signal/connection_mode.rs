// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// How a subscriber wants to receive events from a [`Signal`].
///
/// [`Signal`]: super::Signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum_macros::Display)]
pub enum ConnectionMode {
    /// Called by the emitter, on the emitting thread, before [`emit()`] returns.
    ///
    /// [`emit()`]: super::Signal::emit
    #[default]
    Direct,
    /// Called later on the [`EventLoop`] dispatcher thread.
    ///
    /// [`EventLoop`]: crate::EventLoop
    Async,
}
