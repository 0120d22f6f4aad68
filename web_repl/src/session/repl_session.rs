// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{CommandContext, CommandRegistry, DEFAULT_LOCALE, DispatchOutcome, EditorIntent,
            EvaluationOutcome, EvaluationTask, ExecutionBackend, FRESH_PROMPT_LINE,
            HistoryLimits,
            HistoryStore, HostServices, KeyToken, KeyValueStorage, LineEditorState,
            LoadOutcome, REVERSE_VIDEO_OFF, ReplError, SessionRequest, SessionSettings,
            TerminalSurface, WrapGeometry, apply_key, default_registry, dispatch, ok,
            paint_intents, plan_write_back, render_evaluation_outcome,
            welcome_banner_for_today};
use std::fmt::{Debug, Formatter};

/// Everything a session is made from, other than the surface.
pub struct SessionParts {
    pub storage: Box<dyn KeyValueStorage>,
    pub limits: HistoryLimits,
    pub registry: CommandRegistry,
    pub backend: Box<dyn ExecutionBackend>,
    pub host: Box<dyn HostServices>,
    pub geometry: WrapGeometry,
}

impl Debug for SessionParts {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionParts")
            .field("limits", &self.limits)
            .field("registry", &self.registry)
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

/// # One REPL, end to end
///
/// Owns the line editor state, the history, the command registry, and the surface.
/// The host feeds it one [`KeyToken`] at a time with [`Self::handle_key`]:
///
/// 1. The key goes through [`apply_key`], and the resulting intents are handled in
///    order.
/// 2. Terminal intents are painted on the surface.
/// 3. Host intents go to the dispatcher ([`EditorIntent::Submit`]), to
///    [`HostServices`], or restart the session ([`EditorIntent::Reload`]).
/// 4. A line that no built-in command claims comes back as an [`EvaluationTask`], and
///    a fresh prompt is printed right away. The host runs the task wherever it likes,
///    and hands the outcome to [`Self::write_back_evaluation`] whenever it finishes.
///    The outcome takes the place of the prompt row, and the command being composed
///    is drawn again below it.
///
/// Only surface write failures are returned as errors. Everything else is logged and
/// shown on the surface.
pub struct ReplSession<S: TerminalSurface> {
    pub surface: S,
    pub state: LineEditorState,
    pub history: HistoryStore,
    pub registry: CommandRegistry,
    pub settings: SessionSettings,
    backend: Box<dyn ExecutionBackend>,
    host: Box<dyn HostServices>,
    /// The persisted history was wiped on load, say so on start.
    history_overflowed_on_load: bool,
}

impl<S: TerminalSurface> Debug for ReplSession<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplSession")
            .field("state", &self.state)
            .field("history", &self.history)
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<S: TerminalSurface> ReplSession<S> {
    /// Load the history and put the session together. Nothing is written to the
    /// surface until [`Self::start`].
    ///
    /// # Errors
    ///
    /// Returns an error if the history storage can't be read.
    pub fn try_new(surface: S, parts: SessionParts) -> miette::Result<Self> {
        let SessionParts {
            storage,
            limits,
            registry,
            backend,
            host,
            geometry,
        } = parts;

        let (history, load_outcome) = HistoryStore::load(storage, limits)?;

        ok!(Self {
            surface,
            state: LineEditorState::new(geometry),
            history,
            registry,
            settings: SessionSettings::default(),
            backend,
            host,
            history_overflowed_on_load: load_outcome == LoadOutcome::Overflowed,
        })
    }

    /// Same as [`Self::try_new`], with the built-in commands.
    ///
    /// # Errors
    ///
    /// Returns an error if the history storage can't be read.
    pub fn try_new_with_builtins(
        surface: S,
        storage: Box<dyn KeyValueStorage>,
        backend: Box<dyn ExecutionBackend>,
        host: Box<dyn HostServices>,
    ) -> miette::Result<Self> {
        Self::try_new(
            surface,
            SessionParts {
                storage,
                limits: HistoryLimits::default(),
                registry: default_registry()?,
                backend,
                host,
                geometry: WrapGeometry::default(),
            },
        )
    }

    /// Print the welcome banner and the first prompt.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be written to.
    pub fn start(&mut self) -> miette::Result<()> {
        if self.history_overflowed_on_load {
            tracing::warn!(message = "💾 History was wiped on load, starting fresh");
            self.history_overflowed_on_load = false;
        }
        self.state.reset();
        self.surface
            .write(&welcome_banner_for_today())
            .map_err(ReplError::IO)?;
        self.surface.flush().map_err(ReplError::IO)?;
        ok!()
    }

    /// Handle one key to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be written to.
    pub fn handle_key(&mut self, key: &KeyToken) -> miette::Result<Option<EvaluationTask>> {
        let cursor = self.surface.cursor_position();
        let intents = {
            let names = self.registry.names();
            apply_key(&mut self.state, key, cursor, &mut self.history, &names)
        };

        // % is Display, ? is Debug.
        tracing::debug!(message = "⌨️ Key handled", key = ?key, intents = ?intents);

        let mut maybe_task = None;

        for intent in intents {
            if !intent.is_host_intent() {
                paint_intents(&mut self.surface, std::slice::from_ref(&intent))
                    .map_err(ReplError::IO)?;
                continue;
            }

            match intent {
                EditorIntent::Submit(line) => {
                    if let Some(task) = self.submit(&line)? {
                        maybe_task = Some(task);
                    }
                }
                EditorIntent::Reload => self.reload()?,
                EditorIntent::ToggleFullscreen => {
                    if let Err(report) = self.host.toggle_fullscreen() {
                        tracing::debug!(message = "🖥️ Could not toggle fullscreen", error = ?report);
                    }
                }
                EditorIntent::CopyToClipboard(text) => {
                    if let Err(report) = self.host.copy_to_clipboard(&text) {
                        tracing::debug!(message = "📋 Could not copy to clipboard", error = ?report);
                    }
                }
                // Painted above.
                _ => {}
            }
        }

        self.surface.flush().map_err(ReplError::IO)?;

        ok!(maybe_task)
    }

    fn submit(&mut self, line: &str) -> miette::Result<Option<EvaluationTask>> {
        let mut requests = vec![];

        let outcome = {
            let mut ctx = CommandContext {
                surface: &mut self.surface,
                settings: &mut self.settings,
                requests: &mut requests,
                commands: self.registry.commands(),
            };
            dispatch(&self.registry, self.backend.as_ref(), line, &mut ctx)?
        };

        for request in requests {
            match request {
                SessionRequest::ResetLocale => self.settings.locale = DEFAULT_LOCALE.to_string(),
                SessionRequest::Reload => self.reload()?,
            }
        }

        match outcome {
            DispatchOutcome::Forwarded(task) => {
                // The next command can be typed while this one is evaluated.
                self.surface
                    .write(FRESH_PROMPT_LINE)
                    .map_err(ReplError::IO)?;
                ok!(Some(task))
            }
            DispatchOutcome::Empty | DispatchOutcome::Handled { .. } => ok!(None),
        }
    }

    /// Print the outcome of an evaluation where the command being composed is, which
    /// is then drawn again below it with the cursor where it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be written to.
    pub fn write_back_evaluation(&mut self, outcome: &EvaluationOutcome) -> miette::Result<()> {
        let block = render_evaluation_outcome(outcome);
        let cursor = self.surface.cursor_position();
        let plan = plan_write_back(&mut self.state, cursor, &block);

        paint_intents(&mut self.surface, &plan.intents).map_err(ReplError::IO)?;

        let cursor = self.surface.cursor_position();
        self.state.anchor_origin(cursor, plan.cursor_row_in_command);

        self.surface.flush().map_err(ReplError::IO)?;
        ok!()
    }

    /// Start over: forget the command, clear the surface, and print the banner.
    /// History survives.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface can't be written to.
    pub fn reload(&mut self) -> miette::Result<()> {
        tracing::debug!(message = "🔄 Reloading session");

        self.state.reset();
        self.history.rewind();

        if self.settings.inverted_mode {
            self.settings.inverted_mode = false;
            self.surface.write(REVERSE_VIDEO_OFF).map_err(ReplError::IO)?;
        }

        self.surface.clear().map_err(ReplError::IO)?;
        self.surface.scroll_to_top().map_err(ReplError::IO)?;
        self.surface
            .write(&format!("\x1b[2K\r{}", welcome_banner_for_today()))
            .map_err(ReplError::IO)?;
        self.surface.flush().map_err(ReplError::IO)?;

        ok!()
    }

    /// Bell events since the last call.
    pub fn take_bell_count(&mut self) -> usize { self.surface.take_bell_count() }
}
