// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::path::Path;
use tracing_appender::rolling::{self, RollingFileAppender};

/// Appender for `--log-file`. The file is appended to, and never rotated. A bare file
/// name lands in the current folder.
///
/// It is used as a blocking writer, since the guard of
/// `tracing_appender::non_blocking` would have to outlive the whole session.
///
/// # Errors
///
/// Returns an error if `log_file_path` doesn't end in a file name (eg: `..` or `/`).
pub fn try_create(log_file_path: &str) -> miette::Result<RollingFileAppender> {
    let path = Path::new(log_file_path);

    let Some(file_name) = path.file_name() else {
        miette::bail!("📜 Log file path {} has no file name", path.display());
    };
    let folder = path.parent().unwrap_or_else(|| Path::new(""));

    Ok(rolling::never(folder, file_name))
}
