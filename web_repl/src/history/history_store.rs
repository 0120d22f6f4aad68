// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{HistoryRecall, KeyValueStorage, NavigationState, ok};
use miette::IntoDiagnostic;
use std::fmt::{Debug, Formatter};

/// Key under which the history is persisted, as a JSON array of strings (oldest first).
pub const HISTORY_STORAGE_KEY: &str = "commands";

pub const MAX_SERIALIZED_HISTORY_CHARS: usize = 512_000;
pub const MAX_STORAGE_BYTES: usize = 512_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    /// Upper bound on the length (in chars) of the serialized JSON array.
    pub max_serialized_chars: usize,
    /// Upper bound on [`KeyValueStorage::total_size_in_bytes`].
    pub max_storage_bytes: usize,
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self {
            max_serialized_chars: MAX_SERIALIZED_HISTORY_CHARS,
            max_storage_bytes: MAX_STORAGE_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    /// The persisted history was too big and has been wiped. The session should
    /// restart.
    Overflowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Empty line, nothing recorded.
    Ignored,
    /// Same as the most recent entry, nothing recorded.
    Duplicate,
    Appended,
    /// Persisting the new entry crossed a limit, and everything was wiped.
    Overflowed,
}

/// # Submitted command history
///
/// The entries live in memory and are mirrored to a [`KeyValueStorage`] after every
/// append. `cursor` points at the entry that the next ArrowUp will recall, and ranges
/// over `-1..=len`.
///
/// ## Recall previous (ArrowUp)
///
/// 1. Take the entry at `cursor` and step back.
/// 2. If the last move was an ArrowDown that reversed an ArrowUp, the entry just taken
///    is the one already on screen. Take the one before it instead.
/// 3. Remember that we're moving towards the oldest entry.
/// 4. On running past the oldest entry, stay on it.
///
/// ## Recall next (ArrowDown)
///
/// 1. Step forward and take the entry at `cursor`.
/// 2. If the last move was an ArrowUp, step forward once more for the same reason.
/// 3. Stepping past the newest entry yields [`HistoryRecall::Blank`].
pub struct HistoryStore {
    entries: Vec<String>,
    cursor: isize,
    navigation: NavigationState,
    storage: Box<dyn KeyValueStorage>,
    limits: HistoryLimits,
}

impl Debug for HistoryStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryStore")
            .field("entries", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("navigation", &self.navigation)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl HistoryStore {
    /// Read the persisted history from `storage`.
    ///
    /// A corrupt value is logged and treated as an empty history. It gets
    /// overwritten by the next append.
    ///
    /// # Errors
    ///
    /// Returns an error if `storage` can't be read, or can't be wiped after an
    /// overflow.
    #[tracing::instrument(skip(storage))]
    pub fn load(
        storage: Box<dyn KeyValueStorage>,
        limits: HistoryLimits,
    ) -> miette::Result<(Self, LoadOutcome)> {
        let mut it = Self {
            entries: vec![],
            cursor: -1,
            navigation: NavigationState::default(),
            storage,
            limits,
        };

        let maybe_raw = it.storage.get(HISTORY_STORAGE_KEY)?;
        let raw_chars = maybe_raw.as_ref().map_or(0, |raw| raw.chars().count());

        if raw_chars > limits.max_serialized_chars
            || it.storage.total_size_in_bytes()? > limits.max_storage_bytes
        {
            // % is Display, ? is Debug.
            tracing::warn!(
                message = "💾 Persisted history is too big, wiping it",
                raw_chars = %raw_chars
            );
            it.wipe()?;
            return ok!((it, LoadOutcome::Overflowed));
        }

        if let Some(raw) = maybe_raw {
            match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(entries) => it.entries = entries,
                Err(error) => {
                    tracing::error!(
                        message = "💾 Persisted history is corrupt, starting empty",
                        error = %error
                    );
                }
            }
        }

        it.cursor = it.len_isize() - 1;

        tracing::debug!(message = "💾 Loaded history", entries = %it.entries.len());

        ok!((it, LoadOutcome::Loaded))
    }

    #[must_use]
    pub fn entries(&self) -> &[String] { &self.entries }

    #[must_use]
    pub fn cursor(&self) -> isize { self.cursor }

    #[must_use]
    pub fn navigation(&self) -> NavigationState { self.navigation }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    #[allow(clippy::cast_possible_wrap)]
    fn len_isize(&self) -> isize { self.entries.len() as isize }

    fn entry_at(&self, index: isize) -> HistoryRecall {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.entries.get(index))
            .map_or(HistoryRecall::Blank, |entry| HistoryRecall::Entry(entry.clone()))
    }

    /// Record a submitted line. Storage failures are logged and contained, the
    /// in-memory history is still updated.
    pub fn record_submission(&mut self, line: &str) -> SubmissionOutcome {
        if line.is_empty() {
            return SubmissionOutcome::Ignored;
        }

        self.navigation.clear();

        if self.entries.last().is_some_and(|last| last == line) {
            self.cursor = (self.cursor + 1).min(self.len_isize() - 1);
            return SubmissionOutcome::Duplicate;
        }

        self.entries.push(line.to_string());
        self.cursor = self.len_isize() - 1;

        match self.persist() {
            Ok(true) => SubmissionOutcome::Appended,
            Ok(false) => {
                tracing::warn!(
                    message = "💾 History outgrew its storage limits, wiping it",
                    entries = %self.entries.len()
                );
                if let Err(report) = self.wipe() {
                    tracing::error!(message = "💾 Could not wipe history", error = ?report);
                }
                SubmissionOutcome::Overflowed
            }
            Err(report) => {
                tracing::error!(message = "💾 Could not persist history", error = ?report);
                SubmissionOutcome::Appended
            }
        }
    }

    /// Write the entries to storage. Returns `false` if a limit is crossed.
    fn persist(&mut self) -> miette::Result<bool> {
        let serialized = serde_json::to_string(&self.entries).into_diagnostic()?;

        if serialized.chars().count() > self.limits.max_serialized_chars {
            return ok!(false);
        }

        self.storage.set(HISTORY_STORAGE_KEY, &serialized)?;
        self.storage.flush()?;

        ok!(self.storage.total_size_in_bytes()? <= self.limits.max_storage_bytes)
    }

    fn wipe(&mut self) -> miette::Result<()> {
        self.entries.clear();
        self.cursor = -1;
        self.navigation.clear();
        self.storage.clear()?;
        self.storage.flush()?;
        ok!()
    }

    /// Back to the state right after [`Self::load`], used when the session reloads.
    pub fn rewind(&mut self) {
        self.cursor = self.len_isize() - 1;
        self.navigation.clear();
    }

    /// ArrowUp. `None` means there is nothing to recall.
    pub fn recall_previous(&mut self) -> Option<HistoryRecall> {
        if self.entries.is_empty() || self.cursor < 0 {
            return None;
        }

        let mut recall = self.entry_at(self.cursor);
        self.cursor -= 1;

        if self.navigation.past_newest {
            recall = self.entry_at(self.cursor);
            self.cursor -= 1;
            self.navigation.past_newest = false;
        }

        self.navigation.past_oldest = true;

        if self.cursor < 0 {
            self.cursor = 0;
            self.navigation.past_oldest = false;
        }

        Some(recall)
    }

    /// ArrowDown. `None` means there is nothing to recall.
    pub fn recall_next(&mut self) -> Option<HistoryRecall> {
        if self.entries.is_empty() || self.cursor >= self.len_isize() {
            return None;
        }

        self.cursor += 1;
        let mut recall = self.entry_at(self.cursor);

        if self.navigation.past_oldest {
            self.cursor += 1;
            recall = self.entry_at(self.cursor);
            self.navigation.past_oldest = false;
            self.navigation.past_newest = true;
        }

        self.cursor = self.cursor.min(self.len_isize());

        Some(recall)
    }
}
