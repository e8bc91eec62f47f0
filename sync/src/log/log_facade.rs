// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{Signal, SignalToken, lock_ignoring_poison};
use std::{cell::Cell,
          sync::{LazyLock, Mutex,
                 atomic::{AtomicI32, Ordering}}};

pub const DEBUG: i32 = 10;
pub const INFO: i32 = 20;
pub const WARNING: i32 = 30;
pub const ERROR: i32 = 40;
pub const CRITICAL: i32 = 50;

pub const DEFAULT_MIN_LOG_LEVEL: i32 = INFO;

/// One message sent through the [`logger()`]. Levels are plain integers so that callers
/// can define levels in between the named ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: i32,
    pub message: String,
}

impl LogRecord {
    #[must_use]
    pub fn new(level: i32, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// The name of the highest named level at or below `self.level`.
    #[must_use]
    pub fn level_name(&self) -> &'static str {
        match self.level {
            CRITICAL.. => "CRITICAL",
            ERROR.. => "ERROR",
            WARNING.. => "WARNING",
            INFO.. => "INFO",
            DEBUG.. => "DEBUG",
            _ => "TRACE",
        }
    }
}

static MIN_LOG_LEVEL: AtomicI32 = AtomicI32::new(DEFAULT_MIN_LOG_LEVEL);

static LOGGER: LazyLock<Signal<LogRecord>> = LazyLock::new(Signal::new);

/// Token of the default handler. Connected the first time this is touched.
static DEFAULT_LOG_HANDLER: LazyLock<Mutex<SignalToken<LogRecord>>> =
    LazyLock::new(|| Mutex::new(LOGGER.connect_direct(forward_to_tracing)));

/// The process wide log [`Signal`]. Connect to it to receive every [`LogRecord`] that
/// passes [`get_min_log_level()`].
///
/// Handlers are called on the thread that logged, unless connected with
/// [`ConnectionMode::Async`].
///
/// [`ConnectionMode::Async`]: crate::ConnectionMode::Async
pub fn logger() -> &'static Signal<LogRecord> {
    LazyLock::force(&DEFAULT_LOG_HANDLER);
    &LOGGER
}

#[must_use]
pub fn get_min_log_level() -> i32 { MIN_LOG_LEVEL.load(Ordering::Relaxed) }

/// Records below `level` are dropped before reaching the [`logger()`].
pub fn set_min_log_level(level: i32) { MIN_LOG_LEVEL.store(level, Ordering::Relaxed); }

/// Sends `message` to the [`logger()`], if `level` is at least [`get_min_log_level()`].
pub fn log(level: i32, message: impl Into<String>) {
    if level < get_min_log_level() {
        return;
    }
    logger().emit(LogRecord::new(level, message));
}

pub fn debug(message: impl Into<String>) { log(DEBUG, message); }

pub fn info(message: impl Into<String>) { log(INFO, message); }

pub fn warning(message: impl Into<String>) { log(WARNING, message); }

pub fn error(message: impl Into<String>) { log(ERROR, message); }

pub fn critical(message: impl Into<String>) { log(CRITICAL, message); }

/// (Re)connects the handler that forwards records to [`tracing`]. Any previously
/// registered default handler is disconnected first, so there is at most one.
pub fn register_default_log_handler() {
    let mut handler = lock_ignoring_poison(&DEFAULT_LOG_HANDLER);
    LOGGER.disconnect(&handler);
    *handler = LOGGER.connect_direct(forward_to_tracing);
}

/// Disconnects the default handler, e.g. when the host installs its own.
pub fn unregister_default_log_handler() {
    let mut handler = lock_ignoring_poison(&DEFAULT_LOG_HANDLER);
    LOGGER.disconnect(&handler);
    *handler = SignalToken::default();
}

thread_local! {
    /// Set while this thread is delivering a [`log_caught_panic()`] record.
    static REPORTING_CAUGHT_PANIC: Cell<bool> = const { Cell::new(false) };
}

/// Reports a panic that was caught in user code (a subscriber callback or an event loop
/// action) at [`ERROR`] level through the [`logger()`].
///
/// A panic caught while that record is being delivered, i.e. in a log handler, goes to
/// [`tracing::error!`] only. Otherwise a handler that always panics would recurse
/// forever.
pub(crate) fn log_caught_panic(context: &str, panic_message: &str) {
    if REPORTING_CAUGHT_PANIC.get() {
        tracing::error!(message = context, panic = panic_message, nested = true);
        return;
    }

    REPORTING_CAUGHT_PANIC.set(true);
    error(format!("{context}: {panic_message}"));
    REPORTING_CAUGHT_PANIC.set(false);
}

fn forward_to_tracing(record: LogRecord) {
    let LogRecord { level, message } = record;
    match level {
        CRITICAL.. => tracing::error!(message = %message, level, critical = true),
        ERROR.. => tracing::error!(message = %message, level),
        WARNING.. => tracing::warn!(message = %message, level),
        INFO.. => tracing::info!(message = %message, level),
        DEBUG.. => tracing::debug!(message = %message, level),
        _ => tracing::trace!(message = %message, level),
    }
}
