// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! `wrepl` runs the web terminal REPL in a native terminal. Keys are read with
//! crossterm in raw mode, and lines that aren't built-in commands are evaluated by an
//! interpreter subprocess (`python3 -c <line>` unless told otherwise).

use clap::Parser;
use crossterm::{event::EventStream,
                terminal::{disable_raw_mode, enable_raw_mode}};
use miette::IntoDiagnostic;
use r3bl_web_repl::{CLIArg, LoopExit, ReplConfig, ReplSession, SessionParts,
                    SystemHostServices, VirtualTerminal, default_registry, ok,
                    run_event_loop, try_initialize_logging_global};
use std::io::{Stdout, stdout};

/// Leaves raw mode when dropped, even on the error path.
#[derive(Debug)]
struct RawModeGuard;

impl RawModeGuard {
    fn try_new() -> miette::Result<Self> {
        enable_raw_mode().into_diagnostic()?;
        ok!(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) { disable_raw_mode().ok(); }
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    let cli_arg = CLIArg::parse();
    let config = ReplConfig::try_from_options(&cli_arg.global_options)?;

    try_initialize_logging_global(config.tracing_config.clone())?;
    // % is Display, ? is Debug.
    tracing::debug!(message = "Start logging...", config = ?config);

    let exit = run(config).await?;

    tracing::debug!(message = "Stop logging...", exit = %exit);
    println!();

    ok!()
}

async fn run(config: ReplConfig) -> miette::Result<LoopExit> {
    let parts = SessionParts {
        storage: config.open_history_storage()?,
        limits: config.limits,
        registry: default_registry()?,
        backend: Box::new(config.interpreter.clone()),
        host: Box::new(SystemHostServices),
        geometry: config.geometry,
    };
    let surface: VirtualTerminal<Stdout> =
        VirtualTerminal::new(config.geometry.terminal_columns, Some(stdout()));
    let mut session = ReplSession::try_new(surface, parts)?;

    let _raw_mode_guard = RawModeGuard::try_new()?;
    session.start()?;

    run_event_loop(&mut session, Box::pin(EventStream::new())).await
}
