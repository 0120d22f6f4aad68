// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Errors that end a [`crate::ReplSession`]. Everything else (bad keys, backend
/// failures, storage hiccups, clipboard trouble) is contained where it happens and
/// never reaches the caller.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ReplError {
    /// Reading keys from, or writing to, the terminal failed.
    #[error("🖥️ Terminal I/O failed")]
    #[diagnostic(code(r3bl_web_repl::io))]
    IO(#[from] io::Error),
}
