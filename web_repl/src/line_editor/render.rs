// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CONTINUATION_PREFIX, CursorMotion, EditorIntent, TerminalSurface};
use std::io;

pub const CLEAR_LINE: &str = "\x1b[2K\r";
pub const CLEAR_BELOW: &str = "\x1b[J";

/// The escape sequence for a terminal intent, or `None` for host intents (and motions
/// by zero).
#[must_use]
pub fn encode_intent(intent: &EditorIntent) -> Option<String> {
    match intent {
        EditorIntent::Echo(text) => Some(text.clone()),
        EditorIntent::ClearCommand {
            rows_above,
            rows_below,
        } => {
            let mut acc = String::new();
            if *rows_above > 0 {
                acc.push_str(&format!("\x1b[{rows_above}A"));
            }
            acc.push_str(CLEAR_LINE);
            if rows_above + rows_below > 0 {
                acc.push_str(CLEAR_BELOW);
            }
            Some(acc)
        }
        EditorIntent::ClearLine => Some(CLEAR_LINE.to_string()),
        EditorIntent::MoveCursor(motion) => encode_motion(*motion),
        EditorIntent::NewRow => Some(format!("\r\n{CONTINUATION_PREFIX}")),
        EditorIntent::Submit(_)
        | EditorIntent::Reload
        | EditorIntent::ToggleFullscreen
        | EditorIntent::CopyToClipboard(_) => None,
    }
}

#[must_use]
pub fn encode_motion(motion: CursorMotion) -> Option<String> {
    match motion {
        CursorMotion::Up(0)
        | CursorMotion::Down(0)
        | CursorMotion::Left(0)
        | CursorMotion::Right(0) => None,
        CursorMotion::Up(n) => Some(format!("\x1b[{n}A")),
        CursorMotion::Down(n) => Some(format!("\x1b[{n}B")),
        CursorMotion::Right(n) => Some(format!("\x1b[{n}C")),
        CursorMotion::Left(n) => Some(format!("\x1b[{n}D")),
        CursorMotion::ToColumn(col) => Some(format!("\x1b[{}G", col + 1)),
    }
}

/// Write the terminal intents, in order, to the surface. Host intents are skipped.
///
/// # Errors
///
/// Returns an error if the surface can't be written to.
pub fn paint_intents(
    surface: &mut dyn TerminalSurface,
    intents: &[EditorIntent],
) -> io::Result<()> {
    for intent in intents {
        if let Some(text) = encode_intent(intent) {
            surface.write(&text)?;
        }
    }
    Ok(())
}
