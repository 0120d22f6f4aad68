// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use dirs::config_dir;
use std::{fmt::{Display, Formatter, Result},
          path::PathBuf};

pub enum ConfigPaths {
    R3BLTopLevelFolderName,
    HistoryFolder,
}

impl Display for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let path = match self {
            ConfigPaths::R3BLTopLevelFolderName => "r3bl-web-repl",
            ConfigPaths::HistoryFolder => "history",
        };
        write!(f, "{path}")
    }
}

impl std::fmt::Debug for ConfigPaths {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result { write!(f, "{self}") }
}

/// This is where the config folder is.
#[must_use]
pub fn try_get_config_folder_path() -> Option<PathBuf> {
    let home_config_folder_path = config_dir()?;
    Some(home_config_folder_path.join(ConfigPaths::R3BLTopLevelFolderName.to_string()))
}

/// This is where the history store lives, unless `--history-dir` says otherwise.
#[must_use]
pub fn try_get_history_folder_path() -> Option<PathBuf> {
    Some(try_get_config_folder_path()?.join(ConfigPaths::HistoryFolder.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_folder_is_under_config_folder() {
        if let (Some(config), Some(history)) =
            (try_get_config_folder_path(), try_get_history_folder_path())
        {
            assert!(config.ends_with("r3bl-web-repl"));
            assert!(history.starts_with(&config));
            assert!(history.ends_with("history"));
        }
    }
}
