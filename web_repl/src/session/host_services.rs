// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use copypasta_ext::{copypasta::ClipboardProvider, x11_fork::ClipboardContext};
use miette::IntoDiagnostic;
use std::io::Write;

/// XTWINOPS "toggle full-screen". Terminals that don't support it ignore it.
pub const TOGGLE_FULLSCREEN: &str = "\x1b[10;2t";

/// Things the REPL asks of whatever is hosting it. Failures are not fatal, the
/// session logs them and carries on.
pub trait HostServices {
    /// # Errors
    ///
    /// Returns an error if the clipboard can't be reached.
    fn copy_to_clipboard(&mut self, text: &str) -> miette::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the request can't be sent.
    fn toggle_fullscreen(&mut self) -> miette::Result<()>;
}

/// Uses the system clipboard, and asks the terminal emulator on stdout to go full
/// screen.
#[derive(Debug, Default)]
pub struct SystemHostServices;

impl HostServices for SystemHostServices {
    fn copy_to_clipboard(&mut self, text: &str) -> miette::Result<()> {
        let mut ctx =
            ClipboardContext::new().map_err(|error| miette::miette!("{error}"))?;
        ctx.set_contents(text.to_string())
            .map_err(|error| miette::miette!("{error}"))?;

        // % is Display, ? is Debug.
        tracing::debug!(message = "📋 Command was copied to clipboard", copied = %text);

        Ok(())
    }

    fn toggle_fullscreen(&mut self) -> miette::Result<()> {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(TOGGLE_FULLSCREEN.as_bytes())
            .into_diagnostic()?;
        stdout.flush().into_diagnostic()
    }
}
