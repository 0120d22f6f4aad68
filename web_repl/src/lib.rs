// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! # r3bl_web_repl
//!
//! The line editor core of a web terminal REPL. Raw keystrokes come in one at a time,
//! and this crate turns them into:
//! 1. Edits of an in-memory command buffer, which is laid out over a fixed-width
//!    wrapped prompt (`">>> "` followed by up to 96 columns per row).
//! 2. A small list of [`EditorIntent`]s, which the [renderer](mod@line_editor::render)
//!    translates into ANSI escape sequences for a [`TerminalSurface`].
//! 3. History navigation over a persistent [`HistoryStore`].
//! 4. Prefix tab completion over the names in a [`CommandRegistry`].
//! 5. Dispatch of submitted lines, either to a built-in command handler or to an
//!    [`ExecutionBackend`], whose result comes back later as an [`EvaluationTask`].
//!
//! ```text
//! KeyToken ──▶ apply_key() ──▶ Vec<EditorIntent> ──▶ paint_intents() ──▶ TerminalSurface
//!                  │                   │
//!                  ▼                   └── Submit(line) ──▶ dispatch() ──▶ handler
//!            HistoryStore                                        └──▶ EvaluationTask
//! ```
//!
//! [`ReplSession`] wires all of this together, and the `wrepl` binary drives a session
//! from a real terminal using crossterm, with [`SubprocessBackend`] as the execution
//! backend.

// Enforce strict error handling in production library code only. Tests are allowed to
// use .unwrap() (workspace `Cargo.toml` config allows it).
#![cfg_attr(not(test), deny(clippy::unwrap_in_result))]

// Attach modules.
pub mod config;
pub mod core;
pub mod dispatch;
pub mod history;
pub mod line_editor;
pub mod session;

// Re-export.
pub use config::*;
pub use crate::core::*;
pub use dispatch::*;
pub use history::*;
pub use line_editor::*;
pub use session::*;
