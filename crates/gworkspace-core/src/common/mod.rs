//! Common Utilities
//!
//! Shared types, error handling, and utility functions used across the workspace.

pub mod error;
pub mod http;
pub mod paths;
pub mod result;

pub use error::{AppError, ErrorCode};
pub use http::create_http_client;
pub use paths::{config_path, gworkspace_dir, token_path};
pub use result::AppResult;
