// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use rand::Rng;
use std::{ops::Deref,
          path::{Path, PathBuf}};

/// A folder under the system temp folder, removed (with everything in it) on drop.
/// Tests that open a [`crate::KvStorage`] put the store in one of these.
#[derive(Debug)]
pub struct TempDir {
    pub inner: PathBuf,
}

/// # Errors
///
/// Returns an error if the folder can't be created.
pub fn try_create_temp_dir() -> miette::Result<TempDir> {
    let suffix: u32 = rand::rng().random();
    let inner = std::env::temp_dir().join(format!("r3bl_web_repl_{suffix:08x}"));
    std::fs::create_dir(&inner).into_diagnostic()?;
    Ok(TempDir { inner })
}

impl Drop for TempDir {
    fn drop(&mut self) { std::fs::remove_dir_all(&self.inner).ok(); }
}

impl Deref for TempDir {
    type Target = PathBuf;

    fn deref(&self) -> &PathBuf { &self.inner }
}

impl AsRef<Path> for TempDir {
    fn as_ref(&self) -> &Path { &self.inner }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_and_contents_are_removed_on_drop() {
        let temp_dir = try_create_temp_dir().unwrap();
        let history_folder = temp_dir.join("history");
        std::fs::create_dir(&history_folder).unwrap();
        std::fs::write(history_folder.join("db"), "[]").unwrap();

        let path = temp_dir.inner.clone();
        drop(temp_dir);

        assert!(!path.exists());
    }
}
