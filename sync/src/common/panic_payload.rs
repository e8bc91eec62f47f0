// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::any::Any;

const UNKNOWN_PANIC_MSG: &str = "<non-string panic payload>";

/// Extracts the message from a payload returned by [`std::panic::catch_unwind()`].
///
/// [`panic!`] with a literal produces a `&'static str` payload and with a format string
/// produces a [`String`]. Anything else (from [`std::panic::panic_any()`]) has no
/// message.
#[must_use]
pub fn panic_payload_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(it) = payload.downcast_ref::<&'static str>() {
        it
    } else if let Some(it) = payload.downcast_ref::<String>() {
        it.as_str()
    } else {
        UNKNOWN_PANIC_MSG
    }
}
