// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Relative cursor motions. Counts of zero are no-ops. Columns are 0 based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMotion {
    Up(usize),
    Down(usize),
    Left(usize),
    Right(usize),
    ToColumn(usize),
}

/// What the line editor wants done in response to a key. Terminal intents are turned
/// into escape sequences by [`crate::paint_intents`]. Host intents are routed by
/// [`crate::ReplSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorIntent {
    /// Write the text as is.
    Echo(String),
    /// Go up to the first row of the command, and erase it along with everything
    /// below it when the command spans more than one row.
    ClearCommand { rows_above: usize, rows_below: usize },
    /// Erase the cursor's row and return to column 0.
    ClearLine,
    MoveCursor(CursorMotion),
    /// Start the next row of a wrapped command, under the prompt.
    NewRow,
    /// Hand the line to the dispatcher.
    Submit(String),
    /// Restart the session.
    Reload,
    ToggleFullscreen,
    CopyToClipboard(String),
}

impl EditorIntent {
    #[must_use]
    pub fn is_host_intent(&self) -> bool {
        matches!(
            self,
            Self::Submit(_) | Self::Reload | Self::ToggleFullscreen | Self::CopyToClipboard(_)
        )
    }
}
