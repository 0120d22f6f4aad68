// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{GlobalOption, HistoryLimits, InMemoryStorage, KeyValueStorage, KvStorage,
            SubprocessBackend, TracingConfig, WrapGeometry, WriterConfig, ok,
            try_get_history_folder_path};
use std::path::PathBuf;
use tracing_core::LevelFilter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryLocation {
    /// Lost when the process exits.
    InMemory,
    /// A `kv` store in this folder.
    Folder(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    #[error("📂 Could not find the config folder to keep history in")]
    #[diagnostic(
        code(config_error::config_folder_path_could_not_be_accessed),
        help("Pass --history-dir <DIR>, or --in-memory-history")
    )]
    ConfigFolderPathCouldNotBeAccessed,
}

/// Everything the `wrepl` binary needs to put a session together.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    pub geometry: WrapGeometry,
    pub history_location: HistoryLocation,
    pub limits: HistoryLimits,
    pub interpreter: SubprocessBackend,
    pub tracing_config: TracingConfig,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            geometry: WrapGeometry::default(),
            history_location: HistoryLocation::InMemory,
            limits: HistoryLimits::default(),
            interpreter: SubprocessBackend::default(),
            tracing_config: TracingConfig::from(LevelFilter::OFF),
        }
    }
}

impl ReplConfig {
    /// Resolve the command line options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigFolderPathCouldNotBeAccessed`] if the default
    /// history folder is needed, and there's no config folder on this platform.
    pub fn try_from_options(options: &GlobalOption) -> Result<Self, ConfigError> {
        let history_location = if options.in_memory_history {
            HistoryLocation::InMemory
        } else if let Some(dir) = &options.history_dir {
            HistoryLocation::Folder(PathBuf::from(dir))
        } else {
            HistoryLocation::Folder(
                try_get_history_folder_path()
                    .ok_or(ConfigError::ConfigFolderPathCouldNotBeAccessed)?,
            )
        };

        let tracing_config = if options.enable_logging {
            TracingConfig::new_file(Some(options.log_file.clone()), LevelFilter::DEBUG)
        } else {
            TracingConfig::from(LevelFilter::OFF)
        };

        ok!(Self {
            history_location,
            interpreter: SubprocessBackend::new(
                options.interpreter.clone(),
                options.interpreter_args.clone(),
            ),
            tracing_config,
            ..Default::default()
        })
    }

    #[must_use]
    pub fn is_logging_enabled(&self) -> bool {
        self.tracing_config.writer_config != WriterConfig::None
    }

    /// # Errors
    ///
    /// Returns an error if the history folder can't be created or opened.
    pub fn open_history_storage(&self) -> miette::Result<Box<dyn KeyValueStorage>> {
        match &self.history_location {
            HistoryLocation::InMemory => ok!(Box::new(InMemoryStorage::new())),
            HistoryLocation::Folder(path) => ok!(Box::new(KvStorage::try_open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CLIArg, HISTORY_STORAGE_KEY, try_create_temp_dir};
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn options(args: &[&str]) -> GlobalOption {
        CLIArg::try_parse_from(std::iter::once("wrepl").chain(args.iter().copied()))
            .unwrap()
            .global_options
    }

    #[test]
    fn test_in_memory_without_logging() {
        let it = ReplConfig::try_from_options(&options(&["--in-memory-history"])).unwrap();
        assert_eq!(it.history_location, HistoryLocation::InMemory);
        assert!(!it.is_logging_enabled());
        assert_eq!(it.interpreter, SubprocessBackend::default());
        assert_eq!(it.geometry, WrapGeometry::default());
    }

    #[test]
    fn test_logging_goes_to_file() {
        let it = ReplConfig::try_from_options(&options(&[
            "--in-memory-history",
            "-l",
            "--log-file",
            "/tmp/wrepl.log",
        ]))
        .unwrap();
        assert!(it.is_logging_enabled());
        assert_eq!(
            it.tracing_config.writer_config,
            WriterConfig::File("/tmp/wrepl.log".into())
        );
    }

    #[test]
    fn test_explicit_history_dir() {
        let it = ReplConfig::try_from_options(&options(&["--history-dir", "/tmp/h"])).unwrap();
        assert_eq!(
            it.history_location,
            HistoryLocation::Folder(PathBuf::from("/tmp/h"))
        );
    }

    #[serial]
    #[test]
    fn test_open_history_storage_in_folder() {
        let dir = try_create_temp_dir().unwrap();
        let config = ReplConfig {
            history_location: HistoryLocation::Folder(dir.join("history")),
            ..Default::default()
        };
        let mut storage = config.open_history_storage().unwrap();
        storage.set(HISTORY_STORAGE_KEY, "[]").unwrap();
        assert_eq!(
            storage.get(HISTORY_STORAGE_KEY).unwrap(),
            Some("[]".to_string())
        );
    }
}
