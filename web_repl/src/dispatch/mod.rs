// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod builtin_commands;
pub mod command_registry;
pub mod dispatcher;
pub mod execution_backend;
pub mod subprocess_backend;

// Re-export.
pub use builtin_commands::*;
pub use command_registry::*;
pub use dispatcher::*;
pub use execution_backend::*;
pub use subprocess_backend::*;
