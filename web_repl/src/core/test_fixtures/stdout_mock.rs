// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::StdMutex;
use std::{io::{Result, Write},
          sync::Arc};

/// Stands in for stdout as the sink of a [`crate::VirtualTerminal`], so tests can see
/// the exact bytes a real terminal would get. Clones share the same bytes.
#[derive(Clone, Debug, Default)]
pub struct StdoutMock {
    pub buffer: Arc<StdMutex<Vec<u8>>>,
}

impl StdoutMock {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_copy_of_buffer_as_string(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).to_string()
    }

    /// Everything written so far, and forget it. Handy to look at the output of one
    /// step at a time.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    pub fn drain_as_string(&self) -> String {
        let bytes = std::mem::take(&mut *self.buffer.lock().unwrap());
        String::from_utf8_lossy(&bytes).to_string()
    }

    /// What a reader would see, with escape sequences removed. Cursor motions are
    /// dropped too, so this is only meaningful for output that is written in order.
    ///
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_visible_text(&self) -> String {
        let stripped = strip_ansi_escapes::strip(self.buffer.lock().unwrap().as_slice());
        String::from_utf8_lossy(&stripped).to_string()
    }
}

impl Write for StdoutMock {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<()> { Ok(()) }
}
