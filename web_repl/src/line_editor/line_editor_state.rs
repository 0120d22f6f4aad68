// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CursorPosition, PROMPT_WIDTH, TabState, WrapGeometry, WrapLayout};

/// Everything the line editor remembers between keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditorState {
    /// The command being composed. Offsets into it are char offsets.
    pub buffer: String,
    /// Absolute surface row of the first row of the command. `None` means the cursor
    /// was left at the end of a freshly drawn command, and the origin can be worked out
    /// from there the next time it is needed.
    pub origin_row: Option<usize>,
    pub tab_state: TabState,
    pub geometry: WrapGeometry,
}

impl LineEditorState {
    #[must_use]
    pub fn new(geometry: WrapGeometry) -> Self {
        Self {
            geometry,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn layout(&self) -> WrapLayout { WrapLayout::new(&self.buffer, self.geometry) }

    /// Forget the command, keeping the geometry.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.origin_row = None;
        self.tab_state.reset();
    }

    /// Origin row, working it out from `cursor` (assumed to be at the end of the
    /// command) if it isn't known.
    #[must_use]
    pub fn origin_row_for(&self, cursor: CursorPosition, layout: &WrapLayout) -> usize {
        self.origin_row
            .unwrap_or_else(|| cursor.row.saturating_sub(layout.end_row()))
    }

    /// Pin down a lazy origin. Call before anything moves the cursor away from the
    /// end of the command.
    pub fn resolve_origin(&mut self, cursor: CursorPosition) {
        if self.origin_row.is_none() && !self.buffer.is_empty() {
            let layout = self.layout();
            self.origin_row = Some(self.origin_row_for(cursor, &layout));
        }
    }

    /// Pin the origin, given that the cursor sits on row `row_in_command` of the
    /// command. Does nothing for an empty buffer.
    pub fn anchor_origin(&mut self, cursor: CursorPosition, row_in_command: usize) {
        self.origin_row = if self.buffer.is_empty() {
            None
        } else {
            Some(cursor.row.saturating_sub(row_in_command))
        };
    }

    /// Row of the cursor relative to the origin, clamped to the rows of `layout`.
    #[must_use]
    pub fn cursor_row_in_command(
        &self,
        cursor: CursorPosition,
        layout: &WrapLayout,
    ) -> usize {
        cursor
            .row
            .saturating_sub(self.origin_row_for(cursor, layout))
            .min(layout.end_row())
    }

    /// How many chars of the buffer are before the cursor, clamped to `0..=len`.
    #[must_use]
    pub fn chars_before_cursor(&self, cursor: CursorPosition, layout: &WrapLayout) -> usize {
        let origin = self.origin_row_for(cursor, layout);
        match cursor.row.checked_sub(origin) {
            None => 0,
            Some(row) if row > layout.end_row() => layout.len(),
            Some(row) => layout.offset_at(row, cursor.col.saturating_sub(PROMPT_WIDTH)),
        }
    }

    /// Byte index of char offset `offset`, or the end of the buffer.
    #[must_use]
    pub fn byte_index(&self, offset: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(offset)
            .map_or(self.buffer.len(), |(index, _)| index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(buffer: &str, origin_row: Option<usize>) -> LineEditorState {
        LineEditorState {
            buffer: buffer.to_string(),
            origin_row,
            ..LineEditorState::new(WrapGeometry::new(5, 11))
        }
    }

    #[test]
    fn test_chars_before_cursor_matches_linear_formula() {
        let it = state("abcdefghijkl", Some(10));
        let layout = it.layout();
        for (row, col) in [(10, 4), (10, 7), (11, 4), (11, 8), (12, 5), (12, 6)] {
            let expected = 5 * (row - 10) + col - PROMPT_WIDTH;
            assert_eq!(
                it.chars_before_cursor(CursorPosition::new(col, row), &layout),
                expected
            );
        }
    }

    #[test]
    fn test_chars_before_cursor_is_clamped() {
        let it = state("abc", Some(10));
        let layout = it.layout();
        assert_eq!(it.chars_before_cursor(CursorPosition::new(2, 10), &layout), 0);
        assert_eq!(it.chars_before_cursor(CursorPosition::new(9, 9), &layout), 0);
        assert_eq!(it.chars_before_cursor(CursorPosition::new(9, 10), &layout), 3);
        assert_eq!(it.chars_before_cursor(CursorPosition::new(4, 15), &layout), 3);
    }

    #[test]
    fn test_lazy_origin() {
        let mut it = state("abcdefg", None);
        let layout = it.layout();
        let cursor = CursorPosition::new(6, 21);
        assert_eq!(it.origin_row_for(cursor, &layout), 20);
        assert_eq!(it.chars_before_cursor(cursor, &layout), 7);

        it.resolve_origin(cursor);
        assert_eq!(it.origin_row, Some(20));
    }

    #[test]
    fn test_byte_index() {
        let it = state("añb", None);
        assert_eq!(it.byte_index(0), 0);
        assert_eq!(it.byte_index(2), 3);
        assert_eq!(it.byte_index(3), 4);
        assert_eq!(it.byte_index(9), 4);
    }
}
