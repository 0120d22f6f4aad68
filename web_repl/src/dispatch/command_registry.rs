// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{TerminalSurface, ok};
use std::fmt::{Debug, Formatter};

pub const DEFAULT_LOCALE: &str = "en";

/// How a submitted line is matched against a command name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ArgumentMode {
    /// The whole trimmed line must equal the name.
    Exact,
    /// The name followed by whitespace and anything, or just the name.
    TakesArguments,
}

/// Session wide settings that built-in commands may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub locale: String,
    /// Light mode, drawn as reverse video.
    pub inverted_mode: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE.to_string(),
            inverted_mode: false,
        }
    }
}

/// Things a command handler can't do by itself, carried out by the session once the
/// handler returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionRequest {
    Reload,
    ResetLocale,
}

/// What a command handler gets to work with.
pub struct CommandContext<'a> {
    pub surface: &'a mut dyn TerminalSurface,
    pub settings: &'a mut SessionSettings,
    pub requests: &'a mut Vec<SessionRequest>,
    /// Every registered command, in registry order.
    pub commands: &'a [RegisteredCommand],
}

impl Debug for CommandContext<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("settings", &self.settings)
            .field("requests", &self.requests)
            .field("commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}

/// Gets the context and the whole trimmed line, including the command name.
pub type CommandHandler =
    Box<dyn Fn(&mut CommandContext<'_>, &str) -> miette::Result<()> + Send + Sync>;

pub struct RegisteredCommand {
    pub name: String,
    pub description: String,
    pub mode: ArgumentMode,
    pub handler: CommandHandler,
}

impl Debug for RegisteredCommand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl RegisteredCommand {
    /// Does `trimmed` invoke this command?
    #[must_use]
    pub fn matches(&self, trimmed: &str) -> bool {
        match self.mode {
            ArgumentMode::Exact => trimmed == self.name,
            ArgumentMode::TakesArguments => match trimmed.strip_prefix(self.name.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with(char::is_whitespace),
                None => false,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum RegistryError {
    #[error("📛 A command named {name} is already registered")]
    #[diagnostic(code(registry_error::duplicate_command_name))]
    DuplicateCommandName { name: String },
}

/// Built-in commands, tried in the order they were registered.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: Vec<RegisteredCommand>,
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCommandName`] if `name` is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        mode: ArgumentMode,
        handler: impl Fn(&mut CommandContext<'_>, &str) -> miette::Result<()>
        + Send
        + Sync
        + 'static,
    ) -> Result<(), RegistryError> {
        let name = name.into();

        if self.commands.iter().any(|it| it.name == name) {
            return Err(RegistryError::DuplicateCommandName { name });
        }

        // % is Display, ? is Debug.
        tracing::debug!(message = "📝 Registered command", name = %name, mode = %mode);

        self.commands.push(RegisteredCommand {
            name,
            description: description.into(),
            mode,
            handler: Box::new(handler),
        });

        ok!()
    }

    #[must_use]
    pub fn commands(&self) -> &[RegisteredCommand] { &self.commands }

    /// Completion candidates, in registry order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|it| it.name.as_str()).collect()
    }

    /// The first command that `trimmed` invokes.
    #[must_use]
    pub fn find(&self, trimmed: &str) -> Option<&RegisteredCommand> {
        self.commands.iter().find(|it| it.matches(trimmed))
    }

    #[must_use]
    pub fn len(&self) -> usize { self.commands.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.commands.is_empty() }
}
