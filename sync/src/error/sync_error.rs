// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Errors returned by this crate. See [`SyncError`], [`ErrorKind`] and
//! [`ErrorSeverity`].

use super::TaskCancelled;
use std::path::PathBuf;

/// Errors from misusing the locking primitives, from the lock file, and cooperative
/// cancellation.
///
/// | Variant           | Cause                                                         | Severity         |
/// | :---------------- | :------------------------------------------------------------ | :--------------- |
/// | [`AlreadyLocked`] | Locking a handle that is already locked (e.g. lock file)      | Recoverable      |
/// | [`NotLocked`]     | Unlocking (or writing through) something this thread lacks    | Programmer error |
/// | [`Deadlock`]      | Same thread re-acquiring an [`OrderedMutex`]                  | Recoverable      |
/// | [`Io`]            | OS failure while opening, locking or writing a lock file      | Recoverable      |
/// | [`TaskCancelled`] | A caller asked the running task to stop                       | Recoverable      |
///
/// Panics raised *inside* subscriber callbacks or event loop actions are never turned
/// into a [`SyncError`]. They are caught and logged where the callback runs.
///
/// [`AlreadyLocked`]: Self::AlreadyLocked
/// [`Deadlock`]: Self::Deadlock
/// [`Io`]: Self::Io
/// [`NotLocked`]: Self::NotLocked
/// [`OrderedMutex`]: crate::OrderedMutex
/// [`TaskCancelled`]: Self::TaskCancelled
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum SyncError {
    #[error("Already locked: {what}")]
    #[diagnostic(
        code(r3bl_sync::already_locked),
        help("Release the existing lock before locking it again.")
    )]
    AlreadyLocked {
        /// What was already locked, e.g. the lock file path.
        what: String,
    },

    #[error("This {what} is not locked by this thread")]
    #[diagnostic(
        code(r3bl_sync::not_locked),
        help("Only the thread that acquired a lock may release it, and only once.")
    )]
    NotLocked {
        /// What was not locked (`"mutex"`, `"lock file"`).
        what: &'static str,
    },

    #[error("Deadlock encountered: this thread already holds the mutex")]
    #[diagnostic(
        code(r3bl_sync::deadlock),
        help(
            "The mutex is not reentrant across modes. Release it before acquiring it \
             again, or restructure the call so the outer lock covers the inner work."
        )
    )]
    Deadlock,

    #[error("Lock file I/O failed for {}", path.display())]
    #[diagnostic(code(r3bl_sync::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    #[diagnostic(code(r3bl_sync::task_cancelled))]
    TaskCancelled(#[from] TaskCancelled),
}

/// A plain tag for each [`SyncError`] variant, for callers that want to branch on the
/// kind of error without destructuring it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum ErrorKind {
    AlreadyLocked,
    NotLocked,
    Deadlock,
    Io,
    TaskCancelled,
}

/// Whether an error is part of normal control flow or signals a bug in the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Expected at runtime; the caller can handle it and carry on.
    Recoverable,
    /// API misuse. Retrying the same call will fail the same way.
    ProgrammerError,
}

impl ErrorKind {
    #[must_use]
    pub fn severity(self) -> ErrorSeverity {
        match self {
            ErrorKind::NotLocked => ErrorSeverity::ProgrammerError,
            ErrorKind::AlreadyLocked
            | ErrorKind::Deadlock
            | ErrorKind::Io
            | ErrorKind::TaskCancelled => ErrorSeverity::Recoverable,
        }
    }
}

impl SyncError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::AlreadyLocked { .. } => ErrorKind::AlreadyLocked,
            SyncError::NotLocked { .. } => ErrorKind::NotLocked,
            SyncError::Deadlock => ErrorKind::Deadlock,
            SyncError::Io { .. } => ErrorKind::Io,
            SyncError::TaskCancelled(_) => ErrorKind::TaskCancelled,
        }
    }

    #[must_use]
    pub fn severity(&self) -> ErrorSeverity { self.kind().severity() }

    /// The OS error code, for [`SyncError::Io`] errors that carry one.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            SyncError::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}
