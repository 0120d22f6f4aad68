// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! A small VT100 style terminal emulator that implements [`TerminalSurface`].
//!
//! Every byte written to it goes through a [`vte::Parser`], which drives a
//! [`VirtualScreen`] (a grid of characters plus a cursor). Optionally the same bytes are
//! forwarded to a real output device, so a host can mirror what the REPL draws.
//!
//! | Sequence Type | Example           | Dispatch Method    | Effect                          |
//! |---------------|-------------------|--------------------|---------------------------------|
//! | Printable     | `"abc"`           | `print()`          | Write at cursor, pending wrap   |
//! | Control       | `\r`, `\n`, BEL   | `execute()`        | Cursor motion, bell counter     |
//! | CSI           | `ESC[2A`, `ESC[K` | `csi_dispatch()`   | Cursor motion and erasing       |
//!
//! Line feed behaves like carriage return plus line feed (xterm's `convertEol`), and
//! the forwarded bytes get the same treatment. SGR and private mode sequences (eg:
//! `ESC[?5h`) are forwarded but don't affect the grid.

use crate::{CursorPosition, TerminalSurface, normalize_newlines};
use std::io::{self, Write};
use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

pub const TAB_STOP_WIDTH: usize = 8;
const WIDE_CHAR_PADDING: char = '\0';

/// Extension trait for [`vte::Params`] providing VT100 parameter extraction.
pub trait ParamsExt {
    /// Missing and zero parameters default to 1.
    fn extract_nth_non_zero(&self, n: usize) -> usize;
    fn extract_nth_opt(&self, n: usize) -> Option<usize>;
}

impl ParamsExt for Params {
    fn extract_nth_non_zero(&self, n: usize) -> usize {
        self.extract_nth_opt(n).map_or(1, |v| v.max(1))
    }

    fn extract_nth_opt(&self, n: usize) -> Option<usize> {
        self.iter()
            .nth(n)
            .and_then(|p| p.first())
            .copied()
            .map(usize::from)
    }
}

/// The grid and cursor of a [`VirtualTerminal`]. Rows grow as the cursor moves down,
/// nothing is ever scrolled off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualScreen {
    pub columns: usize,
    pub lines: Vec<Vec<char>>,
    pub cursor: CursorPosition,
    pub bell_count: usize,
}

impl VirtualScreen {
    #[must_use]
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
            lines: vec![vec![]],
            cursor: CursorPosition::default(),
            bell_count: 0,
        }
    }

    /// The cursor sits at `columns` after printing into the last column. The next
    /// printable character wraps.
    fn is_wrap_pending(&self) -> bool { self.cursor.col >= self.columns }

    fn last_col(&self) -> usize { self.columns - 1 }

    fn ensure_row(&mut self, row: usize) {
        while self.lines.len() <= row {
            self.lines.push(vec![]);
        }
    }

    fn line_feed(&mut self) {
        self.cursor.col = 0;
        self.cursor.row += 1;
        self.ensure_row(self.cursor.row);
    }

    fn put_cell(&mut self, row: usize, col: usize, ch: char) {
        self.ensure_row(row);
        let line = &mut self.lines[row];
        while line.len() <= col {
            line.push(' ');
        }
        line[col] = ch;
    }

    fn print_char(&mut self, ch: char) {
        let width = ch.width().unwrap_or(0);
        if width == 0 {
            return;
        }

        if self.is_wrap_pending() || self.cursor.col + width > self.columns {
            self.line_feed();
        }

        let CursorPosition { col, row } = self.cursor;
        self.put_cell(row, col, ch);
        if width == 2 && col + 1 < self.columns {
            self.put_cell(row, col + 1, WIDE_CHAR_PADDING);
        }
        self.cursor.col = col + width;
    }

    fn erase_in_line(&mut self, mode: usize) {
        let CursorPosition { col, row } = self.cursor;
        let col = col.min(self.last_col());
        self.ensure_row(row);
        let line = &mut self.lines[row];
        match mode {
            // Cursor to end of line.
            0 => line.truncate(col),
            // Start of line to cursor.
            1 => {
                for cell in line.iter_mut().take(col + 1) {
                    *cell = ' ';
                }
            }
            _ => line.clear(),
        }
    }

    fn erase_in_display(&mut self, mode: usize) {
        match mode {
            // Cursor to end of screen.
            0 => {
                self.erase_in_line(0);
                for line in self.lines.iter_mut().skip(self.cursor.row + 1) {
                    line.clear();
                }
            }
            // Start of screen to cursor.
            1 => {
                for line in self.lines.iter_mut().take(self.cursor.row) {
                    line.clear();
                }
                self.erase_in_line(1);
            }
            _ => {
                for line in &mut self.lines {
                    line.clear();
                }
            }
        }
    }

    /// The visible text of `row`, with trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|line| {
                line.iter()
                    .filter(|ch| **ch != WIDE_CHAR_PADDING)
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .unwrap_or_default()
    }

    /// Keep only the cursor's line, which becomes row 0.
    pub fn clear(&mut self) {
        let row = self.cursor.row;
        let kept = self.lines.get(row).cloned().unwrap_or_default();
        self.lines = vec![kept];
        self.cursor.row = 0;
    }
}

impl Perform for VirtualScreen {
    fn print(&mut self, ch: char) { self.print_char(ch); }

    fn execute(&mut self, byte: u8) {
        match byte {
            // BEL.
            0x07 => self.bell_count += 1,
            // BS.
            0x08 => {
                self.cursor.col = self.cursor.col.min(self.last_col()).saturating_sub(1);
            }
            b'\t' => {
                let next_stop = (self.cursor.col / TAB_STOP_WIDTH + 1) * TAB_STOP_WIDTH;
                self.cursor.col = next_stop.min(self.last_col());
            }
            // LF, VT, FF.
            b'\n' | 0x0b | 0x0c => self.line_feed(),
            b'\r' => self.cursor.col = 0,
            _ => {}
        }
    }

    fn csi_dispatch(
        &mut self,
        params: &Params,
        intermediates: &[u8],
        ignore: bool,
        action: char,
    ) {
        // Private modes (`ESC[?5h`) carry an intermediate.
        if ignore || !intermediates.is_empty() {
            return;
        }

        let count = params.extract_nth_non_zero(0);
        match action {
            'A' => self.cursor.row = self.cursor.row.saturating_sub(count),
            'B' => {
                let last_row = self.lines.len().saturating_sub(1);
                self.cursor.row = (self.cursor.row + count).min(last_row);
            }
            'C' => {
                self.cursor.col =
                    (self.cursor.col.min(self.last_col()) + count).min(self.last_col());
            }
            'D' => {
                self.cursor.col =
                    self.cursor.col.min(self.last_col()).saturating_sub(count);
            }
            'G' => self.cursor.col = (count - 1).min(self.last_col()),
            'H' | 'f' => {
                let col = params.extract_nth_non_zero(1);
                self.cursor.row = count - 1;
                self.cursor.col = (col - 1).min(self.last_col());
                self.ensure_row(self.cursor.row);
            }
            'K' => self.erase_in_line(params.extract_nth_opt(0).unwrap_or(0)),
            'J' => self.erase_in_display(params.extract_nth_opt(0).unwrap_or(0)),
            _ => {}
        }
    }
}

/// A [`TerminalSurface`] that keeps a [`VirtualScreen`] in sync with everything written
/// to it, and optionally mirrors the bytes to `sink`.
pub struct VirtualTerminal<W: Write> {
    pub screen: VirtualScreen,
    parser: Parser,
    sink: Option<W>,
}

impl<W: Write> std::fmt::Debug for VirtualTerminal<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualTerminal")
            .field("screen", &self.screen)
            .field("has_sink", &self.sink.is_some())
            .finish()
    }
}

impl VirtualTerminal<io::Sink> {
    /// No output device, only the grid is updated.
    #[must_use]
    pub fn new_headless(columns: usize) -> Self { Self::new(columns, None) }
}

impl<W: Write> VirtualTerminal<W> {
    pub fn new(columns: usize, sink: Option<W>) -> Self {
        Self {
            screen: VirtualScreen::new(columns),
            parser: Parser::new(),
            sink,
        }
    }

    #[must_use]
    pub fn row_text(&self, row: usize) -> String { self.screen.row_text(row) }
}

impl<W: Write> TerminalSurface for VirtualTerminal<W> {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.parser.advance(&mut self.screen, text.as_bytes());

        if let Some(sink) = self.sink.as_mut() {
            sink.write_all(normalize_newlines(text).as_bytes())?;
        }

        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        let kept_line = self.screen.row_text(self.screen.cursor.row);
        self.screen.clear();

        if let Some(sink) = self.sink.as_mut() {
            // Wipe the screen and scrollback, then draw the cursor line at the top.
            let col = self.screen.cursor.col + 1;
            write!(sink, "\x1b[2J\x1b[3J\x1b[H{kept_line}\x1b[{col}G")?;
        }

        Ok(())
    }

    fn scroll_to_top(&mut self) -> io::Result<()> { Ok(()) }

    fn cursor_position(&self) -> CursorPosition { self.screen.cursor }

    fn flush(&mut self) -> io::Result<()> {
        match self.sink.as_mut() {
            Some(sink) => sink.flush(),
            None => Ok(()),
        }
    }

    fn take_bell_count(&mut self) -> usize { std::mem::take(&mut self.screen.bell_count) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StdoutMock;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_print_and_carriage_return_line_feed() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write(">>> abc").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(7, 0));

        term.write("\r\n    d").unwrap();
        assert_eq!(term.row_text(0), ">>> abc");
        assert_eq!(term.row_text(1), "    d");
        assert_eq!(term.cursor_position(), CursorPosition::new(5, 1));
    }

    #[test]
    fn test_line_feed_acts_as_crlf() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write("abc\ndef").unwrap();
        assert_eq!(term.row_text(1), "def");
        assert_eq!(term.cursor_position(), CursorPosition::new(3, 1));
    }

    #[test]
    fn test_pending_wrap_only_fires_on_next_print() {
        let mut term = VirtualTerminal::new_headless(4);
        term.write("abcd").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(4, 0));

        term.write("e").unwrap();
        assert_eq!(term.row_text(0), "abcd");
        assert_eq!(term.row_text(1), "e");
        assert_eq!(term.cursor_position(), CursorPosition::new(1, 1));
    }

    #[test]
    fn test_cursor_motion() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write("0123456789\r\nabc").unwrap();

        term.write("\x1b[A").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(3, 0));

        term.write("\x1b[2C").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(5, 0));

        term.write("\x1b[4D").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(1, 0));

        term.write("\x1b[B\x1b[8G").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(7, 1));

        // Clamped at the last row that exists.
        term.write("\x1b[5B").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(7, 1));

        term.write("\x1b[99D").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(0, 1));
    }

    #[test]
    fn test_erase_line_and_below() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write(">>> abc\r\n    def\r\n    ghi").unwrap();
        term.write("\x1b[2A\x1b[2K\r\x1b[J").unwrap();
        assert_eq!(term.row_text(0), "");
        assert_eq!(term.row_text(1), "");
        assert_eq!(term.row_text(2), "");
        assert_eq!(term.cursor_position(), CursorPosition::new(0, 0));
    }

    #[test]
    fn test_sgr_and_private_modes_do_not_touch_the_grid() {
        let mut term = VirtualTerminal::new_headless(40);
        term.write("\x1b[31;1mred\x1b[m \x1b[?5hx\x1b[?5l").unwrap();
        assert_eq!(term.row_text(0), "red x");
        assert_eq!(term.cursor_position(), CursorPosition::new(5, 0));
    }

    #[test]
    fn test_bell_is_counted() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write("\x07a\x07").unwrap();
        assert_eq!(term.take_bell_count(), 2);
        assert_eq!(term.take_bell_count(), 0);
        assert_eq!(term.row_text(0), "a");
    }

    #[test]
    fn test_wide_chars_take_two_columns() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write("a😀b").unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(4, 0));
        assert_eq!(term.row_text(0), "a😀b");
    }

    #[test]
    fn test_clear_keeps_cursor_line() {
        let mut term = VirtualTerminal::new_headless(20);
        term.write("one\r\ntwo\r\n>>> clear").unwrap();
        term.clear().unwrap();
        assert_eq!(term.cursor_position(), CursorPosition::new(9, 0));
        assert_eq!(term.row_text(0), ">>> clear");
        assert_eq!(term.row_text(1), "");
    }

    #[test]
    fn test_bytes_are_forwarded_to_sink() {
        let stdout_mock = StdoutMock::default();
        let mut term = VirtualTerminal::new(20, Some(stdout_mock.clone()));
        term.write("\x1b[31mhi\x1b[0m\n>>> ").unwrap();
        term.flush().unwrap();
        assert_eq!(
            stdout_mock.get_copy_of_buffer_as_string(),
            "\x1b[31mhi\x1b[0m\r\n>>> "
        );
        let stripped = stdout_mock.get_visible_text();
        assert!(stripped.starts_with("hi"));
        assert!(stripped.ends_with(">>> "));
    }

    #[test]
    fn test_clear_redraws_cursor_line_on_sink() {
        let stdout_mock = StdoutMock::default();
        let mut term = VirtualTerminal::new(20, Some(stdout_mock.clone()));
        term.write("one\r\n>>> clear").unwrap();
        term.clear().unwrap();
        assert!(
            stdout_mock
                .get_copy_of_buffer_as_string()
                .ends_with("\x1b[2J\x1b[3J\x1b[H>>> clear\x1b[10G")
        );
    }
}
