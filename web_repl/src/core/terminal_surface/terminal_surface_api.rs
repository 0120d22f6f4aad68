// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::io;

/// Where the cursor of a [`TerminalSurface`] is. `row` is an absolute row of the
/// surface's buffer (scrollback included), so scrolling doesn't invalidate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CursorPosition {
    pub col: usize,
    pub row: usize,
}

impl CursorPosition {
    #[must_use]
    pub fn new(col: usize, row: usize) -> Self { Self { col, row } }
}

/// The terminal widget that the REPL draws into. All text written to it may contain
/// ANSI escape sequences.
pub trait TerminalSurface {
    /// # Errors
    ///
    /// Returns an error if the underlying output device fails.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the underlying output device fails.
    fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\r\n")
    }

    /// Drop everything except the line the cursor is on, which becomes the first line.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying output device fails.
    fn clear(&mut self) -> io::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the underlying output device fails.
    fn scroll_to_top(&mut self) -> io::Result<()>;

    fn cursor_position(&self) -> CursorPosition;

    /// # Errors
    ///
    /// Returns an error if the underlying output device fails.
    fn flush(&mut self) -> io::Result<()>;

    /// Number of BEL characters written since the last call.
    fn take_bell_count(&mut self) -> usize;
}
