// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// An indication of whether a dedicated thread is running or terminated.
///
/// Used by [`EventLoop::is_running()`] to provide a self-documenting return type instead
/// of a bare `bool`.
///
/// [`EventLoop::is_running()`]: crate::EventLoop::is_running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LivenessState {
    /// The dedicated thread is running and processing actions.
    Running,
    /// The dedicated thread has exited (or was asked to exit and has been joined).
    Terminated,
}
