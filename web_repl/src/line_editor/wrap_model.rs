// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! How a command buffer is laid out on screen.
//!
//! ```text
//! col:  0   4                                                   4+W
//!       ┌───┬─────────────────────── W columns ──────────────────┐
//! row 0 │>>>│ first W columns of the buffer                       │
//! row 1 │   │ next W columns (soft wrap)                          │
//! row 2 │   │ text after a '\n' (hard break)                      │
//!       └───┴─────────────────────────────────────────────────────┘
//! ```
//!
//! Every row is a 4 column prefix (the prompt on the first row, blanks after that)
//! followed by at most `wrap_width` columns of text. With the default geometry a row
//! never goes past column 100 of a 102 column terminal, so the terminal's own autowrap
//! never fires, and this module is the only thing that decides where rows break.
//!
//! All offsets are char offsets into the buffer.

use unicode_width::UnicodeWidthChar;

pub const PROMPT: &str = ">>> ";
pub const PROMPT_WIDTH: usize = 4;
pub const CONTINUATION_PREFIX: &str = "    ";
pub const WRAP_WIDTH: usize = 96;
pub const LAYOUT_COLUMNS: usize = PROMPT_WIDTH + WRAP_WIDTH;
pub const TERMINAL_COLUMNS: usize = 102;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapGeometry {
    pub wrap_width: usize,
    pub terminal_columns: usize,
}

impl Default for WrapGeometry {
    fn default() -> Self {
        Self {
            wrap_width: WRAP_WIDTH,
            terminal_columns: TERMINAL_COLUMNS,
        }
    }
}

impl WrapGeometry {
    /// `wrap_width` is clamped to at least 1.
    #[must_use]
    pub fn new(wrap_width: usize, terminal_columns: usize) -> Self {
        Self {
            wrap_width: wrap_width.max(1),
            terminal_columns,
        }
    }

    #[must_use]
    pub fn layout_columns(&self) -> usize { PROMPT_WIDTH + self.wrap_width }
}

/// What gets drawn for `ch`. Tabs are drawn as one blank, other control characters in
/// caret notation (`^X`, `^?`).
#[must_use]
pub fn glyph_of(ch: char) -> String {
    match ch {
        '\n' => String::new(),
        '\t' => " ".to_string(),
        '\u{7f}' => "^?".to_string(),
        ch if (ch as u32) < 0x20 => {
            // Safe, since the value is below 0x60.
            let caret = char::from_u32(ch as u32 + 0x40).unwrap_or('?');
            format!("^{caret}")
        }
        ch if ch.is_control() => "\u{fffd}".to_string(),
        ch => ch.to_string(),
    }
}

#[must_use]
pub fn glyph_width(ch: char) -> usize {
    match ch {
        '\n' => 0,
        '\t' => 1,
        '\u{7f}' => 2,
        ch if (ch as u32) < 0x20 => 2,
        ch if ch.is_control() => 1,
        ch => ch.width().unwrap_or(0),
    }
}

/// One screen row of a [`WrapLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapRow {
    /// Char offset of the first char on this row.
    pub start: usize,
    /// Number of chars on this row, not counting a trailing `'\n'`.
    pub len: usize,
    /// Display columns used by this row, not counting the prefix.
    pub width: usize,
    /// Whether this row was ended by a `'\n'` (rather than a soft wrap, or the end of
    /// the buffer).
    pub ends_with_break: bool,
}

impl WrapRow {
    #[must_use]
    pub fn end(&self) -> usize { self.start + self.len }
}

/// The rows a buffer occupies, derived from the buffer and a [`WrapGeometry`]. There
/// is always at least one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapLayout {
    pub rows: Vec<WrapRow>,
    /// Display width of every char in the buffer.
    pub widths: Vec<usize>,
}

impl WrapLayout {
    #[must_use]
    pub fn new(buffer: &str, geometry: WrapGeometry) -> Self {
        let wrap_width = geometry.wrap_width.max(1);
        let mut rows = vec![];
        let mut widths = vec![];
        let mut start = 0;
        let mut width = 0;
        let mut count = 0;

        for (index, ch) in buffer.chars().enumerate() {
            count = index + 1;

            if ch == '\n' {
                widths.push(0);
                rows.push(WrapRow {
                    start,
                    len: index - start,
                    width,
                    ends_with_break: true,
                });
                start = index + 1;
                width = 0;
                continue;
            }

            let glyph_width = glyph_width(ch);
            widths.push(glyph_width);

            if width + glyph_width > wrap_width && index > start {
                rows.push(WrapRow {
                    start,
                    len: index - start,
                    width,
                    ends_with_break: false,
                });
                start = index;
                width = 0;
            }

            width += glyph_width;
        }

        rows.push(WrapRow {
            start,
            len: count - start,
            width,
            ends_with_break: false,
        });

        Self { rows, widths }
    }

    /// Number of chars in the buffer.
    #[must_use]
    pub fn len(&self) -> usize { self.widths.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.widths.is_empty() }

    #[must_use]
    pub fn row_count(&self) -> usize { self.rows.len() }

    /// Index of the last row.
    #[must_use]
    pub fn end_row(&self) -> usize { self.rows.len() - 1 }

    fn width_between(&self, start: usize, end: usize) -> usize {
        self.widths[start..end].iter().sum()
    }

    /// Canonical `(row, col)` of the cursor when `offset` chars precede it. `row` is
    /// relative to the first row, `col` includes the prefix.
    ///
    /// At a soft wrap boundary this is the end of the full row, not the start of the
    /// next one.
    #[must_use]
    pub fn position_of(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.len());
        let (row_index, row) = self
            .rows
            .iter()
            .enumerate()
            .find(|(_, row)| offset <= row.end())
            .unwrap_or((self.end_row(), &self.rows[self.end_row()]));
        let offset = offset.max(row.start);
        (row_index, PROMPT_WIDTH + self.width_between(row.start, offset))
    }

    #[must_use]
    pub fn end_position(&self) -> (usize, usize) { self.position_of(self.len()) }

    /// Inverse of [`Self::position_of`]. `text_col` is the column without the prefix.
    /// Positions past the end of a row, or below the last row, are clamped.
    #[must_use]
    pub fn offset_at(&self, row_index: usize, text_col: usize) -> usize {
        let Some(row) = self.rows.get(row_index) else {
            return self.len();
        };

        let mut acc = 0;
        let mut offset = row.start;
        while offset < row.end() && acc + self.widths[offset] <= text_col {
            acc += self.widths[offset];
            offset += 1;
        }
        offset
    }
}

/// Draw the buffer the way it appears after the prompt: rows joined by `"\r\n"` and the
/// continuation prefix.
#[must_use]
pub fn render_rows(buffer: &str, layout: &WrapLayout) -> String {
    let chars: Vec<char> = buffer.chars().collect();
    let mut acc = String::with_capacity(buffer.len() + layout.row_count() * 6);
    for (index, row) in layout.rows.iter().enumerate() {
        if index > 0 {
            acc.push_str("\r\n");
            acc.push_str(CONTINUATION_PREFIX);
        }
        for ch in &chars[row.start..row.end()] {
            acc.push_str(&glyph_of(*ch));
        }
    }
    acc
}
