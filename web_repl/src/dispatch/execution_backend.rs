// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{future::Future, pin::Pin};

/// `Some(text)` is printed, `None` just gets a fresh prompt.
pub type EvaluationOutcome = Result<Option<String>, EvaluationError>;

/// The work of evaluating one line. [`crate::dispatch()`] hands it back without polling
/// it. The caller decides where to run it, and writes the outcome back with
/// [`crate::ReplSession::write_back_evaluation`].
pub type EvaluationTask = Pin<Box<dyn Future<Output = EvaluationOutcome> + Send>>;

/// Evaluates source lines that aren't built-in commands.
pub trait ExecutionBackend {
    fn evaluate(&self, source: String) -> EvaluationTask;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum EvaluationError {
    /// The evaluator ran, and reported an error.
    #[error("{message}")]
    Failed { message: String },

    #[error("🚫 Could not run {program}: {reason}")]
    #[diagnostic(
        code(evaluation_error::unavailable),
        help("Pass a different interpreter with --interpreter")
    )]
    Unavailable { program: String, reason: String },

    #[error("💥 Evaluation was aborted")]
    Panicked,
}
