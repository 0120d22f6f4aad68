// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod common;
pub mod log;
pub mod storage;
pub mod terminal_surface;
pub mod test_fixtures;

// Re-export.
pub use common::*;
pub use log::*;
pub use storage::*;
pub use terminal_surface::*;
pub use test_fixtures::*;
