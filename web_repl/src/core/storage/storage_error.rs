// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

#[derive(thiserror::Error, Debug, miette::Diagnostic)]
pub enum StorageErrorCouldNot {
    #[error("📑 Could not create db folder: '{db_folder_path}' on disk")]
    CreateDbFolder { db_folder_path: String },

    #[error("📦 Could not create bucket from store: '{bucket_name}'")]
    CreateBucketFromStore { bucket_name: String },

    #[error("🔽 Could not save key/value pair to bucket")]
    SaveKeyValuePairToBucket,

    #[error("🔼 Could not load key/value pair from bucket")]
    LoadKeyValuePairFromBucket,

    #[error("❌ Could not remove key/value pair from bucket")]
    RemoveKeyValuePairFromBucket,

    #[error("🧹 Could not clear bucket")]
    ClearBucket,

    #[error("💾 Could not flush bucket to disk")]
    FlushBucket,
}
