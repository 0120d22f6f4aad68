// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod history_store;
pub mod navigation_state;

// Re-export.
pub use history_store::*;
pub use navigation_state::*;
