// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

/// Remembers which end of the history the last recall ran off of, so that reversing
/// direction skips the entry that is already on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavigationState {
    /// Set after ArrowUp, cleared when ArrowUp hits the oldest entry.
    pub past_oldest: bool,
    /// Set when ArrowDown reverses an ArrowUp.
    pub past_newest: bool,
}

impl NavigationState {
    pub fn clear(&mut self) { *self = Self::default(); }
}

/// What a history recall puts in the command buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRecall {
    Entry(String),
    /// Ran past an end of the history, the buffer is emptied.
    Blank,
}
