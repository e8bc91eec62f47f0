// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod common_enums;
pub mod lock_ignoring_poison;
pub mod panic_payload;

// Re-export.
pub use common_enums::*;
pub use lock_ignoring_poison::*;
pub use panic_payload::*;
