// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! The [kv] (sled) side of [`crate::KvStorage`]. One store per history folder, holding
//! one bucket of string keys and JSON encoded string values. Every function here
//! wraps the underlying [`kv::Error`] with a [`StorageErrorCouldNot`], so that the
//! report says which step failed.

use crate::StorageErrorCouldNot;
use kv::{Config, Json, Store};
use miette::{Context, IntoDiagnostic};
use std::path::Path;

/// Name of the only bucket that [`crate::KvStorage`] uses.
pub const REPL_BUCKET_NAME: &str = "web_repl";

/// String keys, and string values saved as [Json]. The store owns the data, so the
/// bucket can outlive the borrow it was created from.
pub type ReplBucket = kv::Bucket<'static, String, Json<String>>;

/// Open the store in `db_folder_path`, creating the folder if needed.
///
/// # Errors
///
/// Returns an error if the folder can't be created or opened, for example because
/// another process holds the lock on it.
#[tracing::instrument]
pub fn try_open_store(db_folder_path: &Path) -> miette::Result<Store> {
    let db_folder_path_str = db_folder_path.to_string_lossy().to_string();

    let store = Store::new(Config::new(db_folder_path))
        .into_diagnostic()
        .wrap_err(StorageErrorCouldNot::CreateDbFolder {
            db_folder_path: db_folder_path_str.clone(),
        })?;

    // % is Display, ? is Debug.
    tracing::debug!(
        message = "📑 Opened store",
        db_folder_path = %db_folder_path_str
    );

    Ok(store)
}

/// # Errors
///
/// Returns an error if the bucket can't be created in the store.
#[tracing::instrument(skip(store))]
pub fn try_open_bucket(store: &Store, bucket_name: &str) -> miette::Result<ReplBucket> {
    store
        .bucket(Some(bucket_name))
        .into_diagnostic()
        .wrap_err(StorageErrorCouldNot::CreateBucketFromStore {
            bucket_name: bucket_name.to_string(),
        })
}

/// # Errors
///
/// Returns an error if the pair can't be saved.
pub fn save_value(bucket: &ReplBucket, key: &str, value: &str) -> miette::Result<()> {
    bucket
        .set(&key.to_string(), &Json(value.to_string()))
        .into_diagnostic()
        .wrap_err(StorageErrorCouldNot::SaveKeyValuePairToBucket)?;

    // % is Display, ? is Debug.
    tracing::debug!(message = "🔽 Saved value", key = %key, len = %value.len());

    Ok(())
}

/// # Errors
///
/// Returns an error if the value can't be read, or isn't a JSON string.
pub fn load_value(bucket: &ReplBucket, key: &str) -> miette::Result<Option<String>> {
    let maybe_value = bucket
        .get(&key.to_string())
        .into_diagnostic()
        .wrap_err(StorageErrorCouldNot::LoadKeyValuePairFromBucket)?;

    Ok(maybe_value.map(|Json(value)| value))
}

/// Returns the value that was removed, if there was one.
///
/// # Errors
///
/// Returns an error if the removal fails.
pub fn remove_value(bucket: &ReplBucket, key: &str) -> miette::Result<Option<String>> {
    let maybe_value = bucket
        .remove(&key.to_string())
        .into_diagnostic()
        .wrap_err(StorageErrorCouldNot::RemoveKeyValuePairFromBucket)?;

    // % is Display, ? is Debug.
    tracing::debug!(
        message = "❌ Removed value",
        key = %key,
        found = %maybe_value.is_some()
    );

    Ok(maybe_value.map(|Json(value)| value))
}

/// Sum of key and value lengths over every pair that can be decoded.
#[must_use]
pub fn measure_bucket(bucket: &ReplBucket) -> usize {
    bucket
        .iter()
        .flatten()
        .filter_map(|item| {
            let key = item.key::<String>().ok()?;
            let Json(value) = item.value::<Json<String>>().ok()?;
            Some(key.len() + value.len())
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ok, try_create_temp_dir};
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_bucket_operations() -> miette::Result<()> {
        let root_temp_dir = try_create_temp_dir()?;
        let db_folder_path = root_temp_dir.join("db_folder");

        let store = try_open_store(&db_folder_path)?;
        assert!(db_folder_path.is_dir());

        let bucket = try_open_bucket(&store, REPL_BUCKET_NAME)?;
        assert_eq!(load_value(&bucket, "commands")?, None);
        assert_eq!(measure_bucket(&bucket), 0);

        save_value(&bucket, "commands", r#"["help","print(1)"]"#)?;
        assert_eq!(
            load_value(&bucket, "commands")?,
            Some(r#"["help","print(1)"]"#.to_string())
        );
        assert_eq!(measure_bucket(&bucket), "commands".len() + 19);

        assert_eq!(
            remove_value(&bucket, "commands")?,
            Some(r#"["help","print(1)"]"#.to_string())
        );
        assert_eq!(remove_value(&bucket, "commands")?, None);

        ok!()
    }

    #[test]
    #[serial]
    fn test_save_into_dropped_bucket_fails() -> miette::Result<()> {
        let root_temp_dir = try_create_temp_dir()?;
        let store = try_open_store(&root_temp_dir.join("db_folder"))?;
        let bucket = try_open_bucket(&store, "scratch")?;
        save_value(&bucket, "foo", "bar")?;

        store.drop_bucket("scratch").into_diagnostic()?;

        let Err(report) = save_value(&bucket, "foo", "bar") else {
            panic!("Saving into a dropped bucket should fail");
        };
        assert_eq!(report.to_string(), "🔽 Could not save key/value pair to bucket");

        ok!()
    }
}
