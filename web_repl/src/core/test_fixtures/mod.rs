// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// Attach sources.
pub mod async_input_stream_mock;
pub mod mock_backend;
pub mod stdout_mock;
pub mod temp_dir;
pub mod test_host_services;

// Re-export.
pub use async_input_stream_mock::*;
pub use mock_backend::*;
pub use stdout_mock::*;
pub use temp_dir::*;
pub use test_host_services::*;
