// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandContext, CommandRegistry, EvaluationOutcome, EvaluationTask,
            ExecutionBackend, PROMPT, ReplError, ok};
use std::fmt::{Debug, Formatter};

pub const FRESH_PROMPT_LINE: &str = "\r\n>>> ";
pub const ERROR_STYLE_START: &str = "\x1b[31;1m";
pub const STYLE_RESET: &str = "\x1b[m";

pub enum DispatchOutcome {
    /// Blank line, a fresh prompt was written.
    Empty,
    /// A built-in command ran. It wrote its own output and prompt.
    Handled { name: String },
    /// Sent to the [`ExecutionBackend`]. The task has not been polled yet.
    Forwarded(EvaluationTask),
}

impl Debug for DispatchOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "Empty"),
            Self::Handled { name } => f.debug_struct("Handled").field("name", name).finish(),
            Self::Forwarded(_) => write!(f, "Forwarded(..)"),
        }
    }
}

/// Route a submitted line to the first matching built-in command, or else to the
/// `backend`.
///
/// A failing handler is reported on the surface as an error block, it is not
/// returned.
///
/// # Errors
///
/// Returns an error if the surface can't be written to.
#[tracing::instrument(skip(registry, backend, ctx))]
pub fn dispatch(
    registry: &CommandRegistry,
    backend: &dyn ExecutionBackend,
    line: &str,
    ctx: &mut CommandContext<'_>,
) -> miette::Result<DispatchOutcome> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        ctx.surface.write(FRESH_PROMPT_LINE).map_err(ReplError::IO)?;
        return ok!(DispatchOutcome::Empty);
    }

    let Some(command) = registry.find(trimmed) else {
        tracing::debug!(message = "📤 Forwarding to execution backend");
        return ok!(DispatchOutcome::Forwarded(backend.evaluate(line.to_string())));
    };

    // % is Display, ? is Debug.
    tracing::debug!(message = "⚡ Running built-in command", name = %command.name);

    if let Err(report) = (command.handler)(ctx, trimmed) {
        tracing::error!(
            message = "⚡ Built-in command failed",
            name = %command.name,
            error = ?report
        );
        ctx.surface
            .write(&render_error_block(&report.to_string()))
            .map_err(ReplError::IO)?;
    }

    ok!(DispatchOutcome::Handled {
        name: command.name.clone()
    })
}

/// The text written to the surface when an evaluation finishes. Always ends with a
/// fresh prompt.
#[must_use]
pub fn render_evaluation_outcome(outcome: &EvaluationOutcome) -> String {
    match outcome {
        Ok(Some(value)) => format!("\r\n{}{FRESH_PROMPT_LINE}", normalize_newlines(value)),
        Ok(None) => FRESH_PROMPT_LINE.to_string(),
        Err(error) => render_error_block(&error.to_string()),
    }
}

/// Bold red message, then a fresh prompt.
#[must_use]
pub fn render_error_block(message: &str) -> String {
    format!(
        "\r\n{ERROR_STYLE_START}{}{STYLE_RESET}\r\n{PROMPT}",
        normalize_newlines(message)
    )
}

/// Every line ending becomes `"\r\n"`.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "\r\n")
}
