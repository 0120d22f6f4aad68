// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{EvaluationError, EvaluationOutcome, EvaluationTask, ExecutionBackend};
use std::process::Stdio;

pub type TokioCommand = tokio::process::Command;

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_INTERPRETER_ARG: &str = "-c";

/// Runs `program args... source` for every line, in a fresh process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubprocessBackend {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SubprocessBackend {
    fn default() -> Self {
        Self {
            program: DEFAULT_INTERPRETER.to_string(),
            args: vec![DEFAULT_INTERPRETER_ARG.to_string()],
        }
    }
}

impl SubprocessBackend {
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl ExecutionBackend for SubprocessBackend {
    fn evaluate(&self, source: String) -> EvaluationTask {
        let program = self.program.clone();
        let args = self.args.clone();
        Box::pin(run_subprocess(program, args, source))
    }
}

#[tracing::instrument(skip(source))]
async fn run_subprocess(
    program: String,
    args: Vec<String>,
    source: String,
) -> EvaluationOutcome {
    let result = TokioCommand::new(&program)
        .args(&args)
        .arg(&source)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await;

    let output = match result {
        Ok(output) => output,
        Err(error) => {
            // % is Display, ? is Debug.
            tracing::debug!(message = "🚫 Could not spawn evaluator", error = %error);
            return Err(EvaluationError::Unavailable {
                program,
                reason: error.to_string(),
            });
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(EvaluationError::Failed {
            message: stderr.trim_end_matches(['\r', '\n']).to_string(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stdout = stdout.trim_end_matches(['\r', '\n']);
    if stdout.is_empty() {
        Ok(None)
    } else {
        Ok(Some(stdout.to_string()))
    }
}
