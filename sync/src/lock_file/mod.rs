// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! An exclusive, non-blocking lock file, e.g. to make sure only one instance of an
//! application runs against a given data directory. See [`LockFile`].

// Attach sources.
pub mod lock_file_impl;

// Re-export.
pub use lock_file_impl::*;
