// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::fmt::{self, Display, Formatter};

pub const TASK_CANCELLED_DEFAULT_MSG: &str = "Task Cancelled";

/// Raised by a long running task when the caller asked it to stop.
///
/// This is a cooperative cancellation signal rather than a failure. It can be cloned,
/// stored, and returned again (for example wrapped in [`SyncError::TaskCancelled`])
/// without losing its message.
///
/// [`SyncError::TaskCancelled`]: super::SyncError::TaskCancelled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCancelled {
    pub message: Option<String>,
}

impl TaskCancelled {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// The custom message, or [`TASK_CANCELLED_DEFAULT_MSG`].
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or(TASK_CANCELLED_DEFAULT_MSG)
    }
}

impl Display for TaskCancelled {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { f.write_str(self.message()) }
}

impl std::error::Error for TaskCancelled {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyncError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_message() {
        let it = TaskCancelled::new();
        assert_eq!(it.to_string(), "Task Cancelled");
    }

    #[test]
    fn test_custom_message() {
        let it = TaskCancelled::with_message("Hello World");
        assert_eq!(it.to_string(), "Hello World");
    }

    #[test]
    fn test_clone_keeps_message() {
        let original = TaskCancelled::with_message("Hello World");
        let copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.message(), "Hello World");
    }

    #[test]
    fn test_rethrow_through_sync_error_keeps_message() {
        fn cancelled_task() -> Result<(), SyncError> {
            Err(TaskCancelled::with_message("Hello World").into())
        }

        fn caller() -> Result<(), SyncError> {
            cancelled_task()?;
            Ok(())
        }

        match caller() {
            Err(SyncError::TaskCancelled(it)) => assert_eq!(it.message(), "Hello World"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
