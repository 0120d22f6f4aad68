// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod decl_macros;
pub mod repl_error;
pub mod type_aliases;

// Re-export.
pub use repl_error::*;
pub use type_aliases::*;
