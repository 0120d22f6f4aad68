// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{HostServices, StdMutex};
use std::sync::Arc;

/// A [`HostServices`] that records what the session asked for. Clones share the same
/// records.
#[derive(Clone, Debug, Default)]
pub struct TestHostServices {
    pub clipboard_copies: Arc<StdMutex<Vec<String>>>,
    pub fullscreen_toggles: Arc<StdMutex<usize>>,
}

impl TestHostServices {
    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_clipboard_copies(&self) -> Vec<String> {
        self.clipboard_copies.lock().unwrap().clone()
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_fullscreen_toggles(&self) -> usize { *self.fullscreen_toggles.lock().unwrap() }
}

impl HostServices for TestHostServices {
    fn copy_to_clipboard(&mut self, text: &str) -> miette::Result<()> {
        self.clipboard_copies.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn toggle_fullscreen(&mut self) -> miette::Result<()> {
        *self.fullscreen_toggles.lock().unwrap() += 1;
        Ok(())
    }
}
