// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Logging support.
//!
//! 1. A leveled logging facade ([`logger()`], [`info()`], [`error()`], ...) that is itself
//!    a [`Signal`] of [`LogRecord`]s. Anyone can subscribe to see every record that passes
//!    the minimum level. A default handler that forwards records to [`tracing`] is
//!    connected the first time the logger is used.
//! 2. [`TracingConfig`] to install a [`tracing`] subscriber that writes to the terminal,
//!    a log file, or both.
//!
//! [`Signal`]: crate::Signal

// Attach sources.
pub mod log_facade;
pub mod log_file_appender;
pub mod tracing_config;
pub mod tracing_init;

// Re-export.
pub use log_facade::*;
pub use log_file_appender::*;
pub use tracing_config::*;
pub use tracing_init::*;
