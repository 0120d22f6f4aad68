// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod event_loop;
pub mod host_services;
pub mod repl_session;
pub mod welcome_banner;

// Re-export.
pub use event_loop::*;
pub use host_services::*;
pub use repl_session::*;
pub use welcome_banner::*;
