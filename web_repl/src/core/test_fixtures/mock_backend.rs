// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EvaluationOutcome, EvaluationTask, ExecutionBackend, StdMutex};
use std::{collections::VecDeque, sync::Arc};

/// An [`ExecutionBackend`] that hands out scripted outcomes in order, and records every
/// source line it was asked to evaluate. Once the script runs out, it answers
/// `Ok(None)`.
///
/// Clones share the same script and log.
#[derive(Clone, Debug, Default)]
pub struct MockBackend {
    pub scripted_outcomes: Arc<StdMutex<VecDeque<EvaluationOutcome>>>,
    pub received_sources: Arc<StdMutex<Vec<String>>>,
}

impl MockBackend {
    #[must_use]
    pub fn new(outcomes: impl IntoIterator<Item = EvaluationOutcome>) -> Self {
        Self {
            scripted_outcomes: Arc::new(StdMutex::new(outcomes.into_iter().collect())),
            received_sources: Arc::default(),
        }
    }

    /// # Panics
    ///
    /// Panics if the lock is poisoned.
    #[must_use]
    pub fn get_received_sources(&self) -> Vec<String> {
        self.received_sources.lock().unwrap().clone()
    }
}

impl ExecutionBackend for MockBackend {
    fn evaluate(&self, source: String) -> EvaluationTask {
        self.received_sources.lock().unwrap().push(source);
        let outcome = self
            .scripted_outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None));
        Box::pin(async move { outcome })
    }
}
