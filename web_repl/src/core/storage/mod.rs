// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach.
pub mod key_value_storage;
pub mod kv_bucket;
pub mod storage_error;

// Re-export.
pub use key_value_storage::*;
pub use kv_bucket::*;
pub use storage_error::*;
