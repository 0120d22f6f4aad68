// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CrosstermEventResult, EvaluationError, EvaluationOutcome, EvaluationTask,
            KeyToken, PinnedInputStream, ReplError, ReplSession, TerminalSurface, ok};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LoopExit {
    /// The input stream ended, and every pending evaluation was written back.
    EndOfInput,
    /// The user pressed Ctrl-D.
    UserQuit,
}

#[must_use]
pub fn is_quit_key(key_event: &KeyEvent) -> bool {
    key_event.kind == KeyEventKind::Press
        && key_event.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key_event.code, KeyCode::Char('d' | 'D'))
}

/// Drive `session` from `input_stream` until the user quits, or the stream ends.
///
/// Evaluations are spawned on the tokio runtime, so keys keep being handled while
/// they run. Their outcomes are written back in the order they finish. Non key
/// events (resize, focus, mouse, paste) are ignored.
///
/// # Errors
///
/// Returns an error if the input stream fails, or the surface can't be written to.
pub async fn run_event_loop<S: TerminalSurface>(
    session: &mut ReplSession<S>,
    mut input_stream: PinnedInputStream<CrosstermEventResult>,
) -> miette::Result<LoopExit> {
    let (outcome_sender, mut outcome_receiver) =
        tokio::sync::mpsc::unbounded_channel::<EvaluationOutcome>();
    let mut pending_evaluations = 0_usize;
    let mut input_closed = false;

    loop {
        if input_closed && pending_evaluations == 0 {
            tracing::debug!(message = "🔚 Input stream closed");
            return ok!(LoopExit::EndOfInput);
        }

        tokio::select! {
            // Cancel safe, the stream keeps any event that wasn't taken.
            maybe_event = input_stream.next(), if !input_closed => {
                match maybe_event {
                    None => input_closed = true,
                    Some(Err(error)) => return Err(ReplError::IO(error).into()),
                    Some(Ok(Event::Key(key_event))) => {
                        if is_quit_key(&key_event) {
                            return ok!(LoopExit::UserQuit);
                        }
                        let Some(key) = KeyToken::from_crossterm(key_event) else {
                            continue;
                        };
                        if let Some(task) = session.handle_key(&key)? {
                            pending_evaluations += 1;
                            spawn_evaluation(task, outcome_sender.clone());
                        }
                    }
                    Some(Ok(other)) => {
                        // % is Display, ? is Debug.
                        tracing::debug!(message = "🙈 Ignoring event", event = ?other);
                    }
                }
            }
            // Cancel safe, recv is cancel safe.
            Some(outcome) = outcome_receiver.recv() => {
                pending_evaluations = pending_evaluations.saturating_sub(1);
                session.write_back_evaluation(&outcome)?;
            }
            else => return ok!(LoopExit::EndOfInput),
        }
    }
}

/// Run `task` on its own tokio task, so a panic inside the backend shows up as
/// [`EvaluationError::Panicked`] instead of taking the loop down.
fn spawn_evaluation(task: EvaluationTask, outcome_sender: UnboundedSender<EvaluationOutcome>) {
    tokio::spawn(async move {
        let outcome = match tokio::spawn(task).await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                tracing::error!(message = "💥 Evaluation task failed", error = ?join_error);
                Err(EvaluationError::Panicked)
            }
        };
        // The receiver is gone once the loop has returned.
        outcome_sender.send(outcome).ok();
    });
}
