// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! [`apply_key`] maps one [`KeyToken`] to edits of the [`LineEditorState`] and a list of
//! [`EditorIntent`]s.
//!
//! | Key                | Effect                                                    |
//! |--------------------|-----------------------------------------------------------|
//! | Esc, F5, Ctrl+F5   | Reload the session                                        |
//! | Ctrl+A             | Start of a single row command                             |
//! | Tab                | Prefix completion over the command names                  |
//! | Ctrl+X             | Insert the cancel marker, drawn as `^X`                   |
//! | Ctrl+C             | Copy the command to the clipboard and abandon it          |
//! | Ctrl+Shift+V       | Rejected                                                  |
//! | Alt+Enter          | Start a new row without submitting                        |
//! | Enter              | Submit and record in history                              |
//! | Up, Down           | History (single row commands only)                        |
//! | Left, Right        | Move one char, crossing wrapped rows                      |
//! | Backspace          | Delete the char before the cursor                         |
//! | F11                | Toggle fullscreen                                         |
//!
//! Positions are always computed from the [`WrapLayout`], so a redraw of the same state
//! produces the same intents.

use crate::{CANDIDATE_SEPARATOR, CompletionOutcome, CursorMotion, CursorPosition,
            EditorIntent, FRESH_PROMPT_LINE, HistoryRecall, HistoryStore, KeyToken,
            LineEditorState, PROMPT, SubmissionOutcome, WrapLayout, complete, glyph_of,
            render_rows};

pub const KEYBOARD_INTERRUPT: &str = "\r\nKeyboardInterrupt\r\n>>> ";

/// Apply one key to the line editor.
///
/// `cursor` is where the terminal surface says the cursor is right now, and
/// `command_names` are the completion candidates in registry order.
pub fn apply_key(
    state: &mut LineEditorState,
    key: &KeyToken,
    cursor: CursorPosition,
    history: &mut HistoryStore,
    command_names: &[&str],
) -> Vec<EditorIntent> {
    if *key != KeyToken::Tab {
        state.tab_state.reset();
    }

    state.resolve_origin(cursor);

    match key {
        KeyToken::Escape | KeyToken::F5 | KeyToken::CtrlF5 => vec![EditorIntent::Reload],
        KeyToken::F11 => vec![EditorIntent::ToggleFullscreen],
        KeyToken::CtrlA => handle_ctrl_a(state, cursor),
        KeyToken::Tab => handle_tab(state, cursor, command_names),
        KeyToken::CtrlX => insert_char(state, '\u{18}', cursor),
        KeyToken::CtrlC => handle_ctrl_c(state, cursor),
        KeyToken::CtrlShiftV => {
            tracing::warn!(message = "📋 Ctrl+Shift+V is not supported, ignoring it");
            vec![]
        }
        KeyToken::AltEnter => {
            let mut acc = move_to_end(state, cursor);
            acc.extend(append_str(state, "\n", cursor));
            acc
        }
        KeyToken::Enter => handle_enter(state, cursor, history),
        KeyToken::ArrowUp => handle_history(state, cursor, history, HistoryDirection::Previous),
        KeyToken::ArrowDown => handle_history(state, cursor, history, HistoryDirection::Next),
        KeyToken::ArrowLeft => handle_arrow_left(state, cursor),
        KeyToken::ArrowRight => handle_arrow_right(state, cursor),
        KeyToken::Backspace => handle_backspace(state, cursor),
        KeyToken::Printable(ch) => insert_char(state, *ch, cursor),
        KeyToken::Unrecognized(raw) => {
            // % is Display, ? is Debug.
            tracing::debug!(message = "🤷 Ignoring unrecognized key", raw = ?raw);
            vec![]
        }
    }
}

/// How to print something in place of the command being composed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteBackPlan {
    pub intents: Vec<EditorIntent>,
    /// Row of the command that the cursor is on once `intents` are painted.
    pub cursor_row_in_command: usize,
}

/// Erase the command (prompt included), print `block` in its place, draw the command
/// again after the prompt that `block` ends with, and put the cursor back where it
/// was. A leading `"\r\n"` in `block` is dropped, since the block starts on the row
/// the prompt was on.
///
/// Once the intents are painted, pass the cursor position to
/// [`LineEditorState::anchor_origin`] along with
/// [`WriteBackPlan::cursor_row_in_command`].
pub fn plan_write_back(
    state: &mut LineEditorState,
    cursor: CursorPosition,
    block: &str,
) -> WriteBackPlan {
    state.resolve_origin(cursor);
    let layout = state.layout();
    let (offset, cursor_row) = if state.buffer.is_empty() {
        (0, 0)
    } else {
        (
            state.chars_before_cursor(cursor, &layout),
            state.cursor_row_in_command(cursor, &layout),
        )
    };

    let mut intents = vec![
        EditorIntent::ClearCommand {
            rows_above: cursor_row,
            rows_below: layout.end_row() - cursor_row,
        },
        EditorIntent::Echo(block.strip_prefix("\r\n").unwrap_or(block).to_string()),
    ];
    if !state.buffer.is_empty() {
        intents.push(EditorIntent::Echo(render_rows(&state.buffer, &layout)));
    }
    let target = layout.position_of(offset);
    intents.extend(motion_between(layout.end_position(), target));

    WriteBackPlan {
        intents,
        cursor_row_in_command: target.0,
    }
}

/// The cursor's `(row, col)` within the command.
fn cursor_in_command(
    state: &LineEditorState,
    cursor: CursorPosition,
    layout: &WrapLayout,
) -> (usize, usize) {
    (state.cursor_row_in_command(cursor, layout), cursor.col)
}

/// Motions that take the cursor from `from` to `to`, both `(row, col)`.
fn motion_between(from: (usize, usize), to: (usize, usize)) -> Vec<EditorIntent> {
    let (from_row, from_col) = from;
    let (to_row, to_col) = to;

    if from_row == to_row {
        return match from_col.cmp(&to_col) {
            std::cmp::Ordering::Greater => {
                vec![EditorIntent::MoveCursor(CursorMotion::Left(from_col - to_col))]
            }
            std::cmp::Ordering::Less => {
                vec![EditorIntent::MoveCursor(CursorMotion::Right(to_col - from_col))]
            }
            std::cmp::Ordering::Equal => vec![],
        };
    }

    let vertical = if to_row < from_row {
        CursorMotion::Up(from_row - to_row)
    } else {
        CursorMotion::Down(to_row - from_row)
    };

    vec![
        EditorIntent::MoveCursor(vertical),
        EditorIntent::MoveCursor(CursorMotion::ToColumn(to_col)),
    ]
}

fn move_to_end(state: &LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    if state.buffer.is_empty() {
        return vec![];
    }
    let layout = state.layout();
    motion_between(
        cursor_in_command(state, cursor, &layout),
        layout.end_position(),
    )
}

/// Append `text` to the buffer, assuming the cursor is at the end of the command.
/// Glyphs that land on a new row are preceded by [`EditorIntent::NewRow`].
fn append_str(
    state: &mut LineEditorState,
    text: &str,
    cursor: CursorPosition,
) -> Vec<EditorIntent> {
    if state.buffer.is_empty() {
        state.origin_row = Some(cursor.row);
    }

    let mut acc = vec![];
    let mut pending_echo = String::new();

    for ch in text.chars() {
        let (old_end_row, _) = state.layout().end_position();
        state.buffer.push(ch);
        let (new_row, _) = state.layout().end_position();

        if ch == '\n' || new_row > old_end_row {
            if !pending_echo.is_empty() {
                acc.push(EditorIntent::Echo(std::mem::take(&mut pending_echo)));
            }
            acc.push(EditorIntent::NewRow);
        }
        pending_echo.push_str(&glyph_of(ch));
    }

    if !pending_echo.is_empty() {
        acc.push(EditorIntent::Echo(pending_echo));
    }

    acc
}

/// Erase the command from the screen, draw it again, and put the cursor at the
/// canonical position of `target_offset`. `old_layout` is the layout that is
/// currently on screen.
fn redraw(
    state: &LineEditorState,
    old_layout: &WrapLayout,
    cursor_row: usize,
    target_offset: usize,
) -> Vec<EditorIntent> {
    let layout = state.layout();
    let mut acc = vec![
        EditorIntent::ClearCommand {
            rows_above: cursor_row,
            rows_below: old_layout.end_row().saturating_sub(cursor_row),
        },
        EditorIntent::Echo(format!("{PROMPT}{}", render_rows(&state.buffer, &layout))),
    ];
    acc.extend(motion_between(
        layout.end_position(),
        layout.position_of(target_offset),
    ));
    acc
}

fn insert_char(
    state: &mut LineEditorState,
    ch: char,
    cursor: CursorPosition,
) -> Vec<EditorIntent> {
    let layout = state.layout();
    let offset = if state.buffer.is_empty() {
        0
    } else {
        state.chars_before_cursor(cursor, &layout)
    };

    if offset == layout.len() {
        let mut acc = vec![];
        let mut buf = [0; 4];
        acc.extend(append_str(state, ch.encode_utf8(&mut buf), cursor));
        return acc;
    }

    let cursor_row = state.cursor_row_in_command(cursor, &layout);
    let byte_index = state.byte_index(offset);
    state.buffer.insert(byte_index, ch);
    redraw(state, &layout, cursor_row, offset + 1)
}

fn handle_backspace(state: &mut LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    let layout = state.layout();
    let offset = state.chars_before_cursor(cursor, &layout);
    if offset == 0 {
        return vec![];
    }

    let cursor_row = state.cursor_row_in_command(cursor, &layout);
    let byte_index = state.byte_index(offset - 1);
    state.buffer.remove(byte_index);
    redraw(state, &layout, cursor_row, offset - 1)
}

/// Zero-width chars share a column with their neighbor, so the arrows skip offsets
/// until the canonical position changes.
fn handle_arrow_left(state: &LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    let layout = state.layout();
    let here = cursor_in_command(state, cursor, &layout);
    let offset = state.chars_before_cursor(cursor, &layout);
    let Some(target) = (0..offset)
        .rev()
        .find(|it| layout.position_of(*it) != here)
    else {
        return vec![];
    };
    motion_between(here, layout.position_of(target))
}

fn handle_arrow_right(state: &LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    let layout = state.layout();
    let here = cursor_in_command(state, cursor, &layout);
    let offset = state.chars_before_cursor(cursor, &layout);
    let Some(target) = (offset + 1..=layout.len()).find(|it| layout.position_of(*it) != here)
    else {
        return vec![];
    };
    motion_between(here, layout.position_of(target))
}

fn handle_ctrl_a(state: &LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    let layout = state.layout();
    if cursor.col > crate::PROMPT_WIDTH && layout.row_count() == 1 {
        vec![EditorIntent::MoveCursor(CursorMotion::Left(
            cursor.col - crate::PROMPT_WIDTH,
        ))]
    } else {
        vec![]
    }
}

fn handle_ctrl_c(state: &mut LineEditorState, cursor: CursorPosition) -> Vec<EditorIntent> {
    let mut acc = vec![EditorIntent::CopyToClipboard(state.buffer.clone())];
    acc.extend(move_to_end(state, cursor));
    acc.push(EditorIntent::Echo(KEYBOARD_INTERRUPT.to_string()));
    state.reset();
    acc
}

fn handle_enter(
    state: &mut LineEditorState,
    cursor: CursorPosition,
    history: &mut HistoryStore,
) -> Vec<EditorIntent> {
    let mut acc = move_to_end(state, cursor);
    let line = std::mem::take(&mut state.buffer);

    let outcome = history.record_submission(&line);
    acc.push(EditorIntent::Submit(line));
    if outcome == SubmissionOutcome::Overflowed {
        acc.push(EditorIntent::Reload);
    }

    state.reset();
    acc
}

fn handle_tab(
    state: &mut LineEditorState,
    cursor: CursorPosition,
    command_names: &[&str],
) -> Vec<EditorIntent> {
    match complete(&state.buffer, &mut state.tab_state, command_names) {
        CompletionOutcome::Noop => vec![],
        CompletionOutcome::InsertTab => insert_char(state, '\t', cursor),
        CompletionOutcome::Append(suffix) => {
            let mut acc = move_to_end(state, cursor);
            acc.extend(append_str(state, &suffix, cursor));
            acc
        }
        CompletionOutcome::ListCandidates(names) => {
            let mut acc = move_to_end(state, cursor);
            let layout = state.layout();
            acc.push(EditorIntent::Echo(format!(
                "\r\n{}\r\n",
                names.join(CANDIDATE_SEPARATOR)
            )));
            acc.push(EditorIntent::Echo(format!(
                "{PROMPT}{}",
                render_rows(&state.buffer, &layout)
            )));
            state.origin_row = None;
            acc
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryDirection {
    Previous,
    Next,
}

fn handle_history(
    state: &mut LineEditorState,
    cursor: CursorPosition,
    history: &mut HistoryStore,
    direction: HistoryDirection,
) -> Vec<EditorIntent> {
    if state.layout().row_count() > 1 {
        return vec![];
    }

    let maybe_recall = match direction {
        HistoryDirection::Previous => history.recall_previous(),
        HistoryDirection::Next => history.recall_next(),
    };

    let Some(recall) = maybe_recall else {
        return vec![];
    };

    let mut acc = vec![EditorIntent::ClearLine];
    match recall {
        HistoryRecall::Entry(entry) if entry.contains('\n') => {
            // Multi-line entries are shown, but can't be edited.
            let entry = entry.replace("\r\n", "\n");
            let layout = WrapLayout::new(&entry, state.geometry);
            acc.push(EditorIntent::Echo(format!(
                "{PROMPT}{}",
                render_rows(&entry, &layout)
            )));
            acc.push(EditorIntent::Echo(FRESH_PROMPT_LINE.to_string()));
            state.buffer.clear();
            state.origin_row = None;
        }
        HistoryRecall::Entry(entry) => {
            let layout = WrapLayout::new(&entry, state.geometry);
            acc.push(EditorIntent::Echo(format!(
                "{PROMPT}{}",
                render_rows(&entry, &layout)
            )));
            state.buffer = entry;
            state.origin_row = Some(cursor.row);
        }
        HistoryRecall::Blank => {
            acc.push(EditorIntent::Echo(PROMPT.to_string()));
            state.buffer.clear();
            state.origin_row = None;
        }
    }
    acc
}
