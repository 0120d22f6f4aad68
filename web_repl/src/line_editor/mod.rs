// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The keystroke to line editor state machine.
//!
//! [`apply_key`] takes one [`KeyToken`] plus the cursor position reported by the
//! terminal surface, mutates the [`LineEditorState`] (and the [`crate::HistoryStore`]),
//! and returns a list of [`EditorIntent`]s. Nothing in here writes to the terminal,
//! [`paint_intents`] does that.

// Attach.
pub mod completion;
pub mod editor_intent;
pub mod key_event_interpreter;
pub mod key_token;
pub mod line_editor_state;
pub mod render;
pub mod wrap_model;

// Re-export.
pub use completion::*;
pub use editor_intent::*;
pub use key_event_interpreter::*;
pub use key_token::*;
pub use line_editor_state::*;
pub use render::*;
pub use wrap_model::*;
