// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Scripted stand-ins for crossterm's `EventStream`, for driving
//! [`crate::run_event_loop`] without a terminal.

use crate::{CrosstermEventResult, InlineVec, PinnedInputStream};
use async_stream::stream;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Yields `events` in order, then ends.
pub fn gen_input_stream<T>(events: InlineVec<T>) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    Box::pin(stream! {
        for event in events {
            yield event;
        }
    })
}

/// Same as [`gen_input_stream`], with a pause before every event, so that spawned work
/// gets a chance to finish between keys.
pub fn gen_input_stream_with_delay<T>(
    events: InlineVec<T>,
    delay: Duration,
) -> PinnedInputStream<T>
where
    T: Send + Sync + 'static,
{
    Box::pin(stream! {
        for event in events {
            tokio::time::sleep(delay).await;
            yield event;
        }
    })
}

#[must_use]
pub fn key_press(code: KeyCode) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
}

#[must_use]
pub fn ctrl_key_press(ch: char) -> CrosstermEventResult {
    Ok(Event::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)))
}

/// One key press per char of `text`.
#[must_use]
pub fn typed(text: &str) -> InlineVec<CrosstermEventResult> {
    text.chars().map(|ch| key_press(KeyCode::Char(ch))).collect()
}
