// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{REPL_BUCKET_NAME, ReplBucket, StorageErrorCouldNot, load_value,
            measure_bucket, ok, remove_value, save_value, try_open_bucket,
            try_open_store};
use kv::Store;
use miette::{Context, IntoDiagnostic};
use std::{collections::BTreeMap, path::Path};

/// String keyed, string valued persistence used by [`crate::HistoryStore`]. It plays
/// the role of the browser's local storage in the web terminal.
pub trait KeyValueStorage {
    /// # Errors
    ///
    /// Returns an error if the backing store can't be read.
    fn get(&self, key: &str) -> miette::Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn set(&mut self, key: &str, value: &str) -> miette::Result<()>;

    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn remove(&mut self, key: &str) -> miette::Result<()>;

    /// Remove every key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be written.
    fn clear(&mut self) -> miette::Result<()>;

    /// Sum of the lengths of all keys and values, in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store can't be read.
    fn total_size_in_bytes(&self) -> miette::Result<usize>;

    /// # Errors
    ///
    /// Returns an error if pending writes can't be made durable.
    fn flush(&mut self) -> miette::Result<()>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InMemoryStorage {
    pub map: BTreeMap<String, String>,
}

impl InMemoryStorage {
    #[must_use]
    pub fn new() -> Self { Self::default() }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> miette::Result<Option<String>> {
        ok!(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> miette::Result<()> {
        self.map.insert(key.to_string(), value.to_string());
        ok!()
    }

    fn remove(&mut self, key: &str) -> miette::Result<()> {
        self.map.remove(key);
        ok!()
    }

    fn clear(&mut self) -> miette::Result<()> {
        self.map.clear();
        ok!()
    }

    fn total_size_in_bytes(&self) -> miette::Result<usize> {
        ok!(self.map.iter().map(|(k, v)| k.len() + v.len()).sum())
    }

    fn flush(&mut self) -> miette::Result<()> { ok!() }
}

/// Durable [`KeyValueStorage`] backed by a single [`kv`] bucket on disk.
pub struct KvStorage {
    pub store: Store,
    pub bucket: ReplBucket,
}

impl std::fmt::Debug for KvStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStorage")
            .field("path", &self.store.path())
            .finish()
    }
}

impl KvStorage {
    /// Open (or create) the store in `db_folder_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder or the bucket can't be created.
    pub fn try_open(db_folder_path: impl AsRef<Path>) -> miette::Result<Self> {
        let store = try_open_store(db_folder_path.as_ref())?;
        let bucket = try_open_bucket(&store, REPL_BUCKET_NAME)?;
        ok!(Self { store, bucket })
    }
}

impl KeyValueStorage for KvStorage {
    fn get(&self, key: &str) -> miette::Result<Option<String>> {
        load_value(&self.bucket, key)
    }

    fn set(&mut self, key: &str, value: &str) -> miette::Result<()> {
        save_value(&self.bucket, key, value)
    }

    fn remove(&mut self, key: &str) -> miette::Result<()> {
        remove_value(&self.bucket, key)?;
        ok!()
    }

    fn clear(&mut self) -> miette::Result<()> {
        self.bucket
            .clear()
            .into_diagnostic()
            .wrap_err(StorageErrorCouldNot::ClearBucket)?;

        tracing::debug!(message = "🧹 Cleared bucket");

        ok!()
    }

    fn total_size_in_bytes(&self) -> miette::Result<usize> {
        ok!(measure_bucket(&self.bucket))
    }

    fn flush(&mut self) -> miette::Result<()> {
        self.bucket
            .flush()
            .into_diagnostic()
            .wrap_err(StorageErrorCouldNot::FlushBucket)?;
        ok!()
    }
}
