// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::PROMPT;
use chrono::Datelike;

/// Printed when the session starts, and after every reload. Ends with a prompt.
#[must_use]
pub fn welcome_banner(year: i32) -> String {
    format!(
        "Welcome to the web terminal REPL in {year} ⚙️\r\n\
         Type \x1b[1mhelp\x1b[0m to list the built-in commands.\r\n{PROMPT}"
    )
}

#[must_use]
pub fn welcome_banner_for_today() -> String { welcome_banner(chrono::Local::now().year()) }
