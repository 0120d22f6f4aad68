// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod terminal_surface_api;
pub mod virtual_terminal;

// Re-export.
pub use terminal_surface_api::*;
pub use virtual_terminal::*;
