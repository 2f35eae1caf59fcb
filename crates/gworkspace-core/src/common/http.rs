//! HTTP Client Utilities
//!
//! Shared HTTP client creation with consistent configuration.

use std::time::Duration;

use super::{AppError, AppResult};

/// Default request timeout for Google API calls
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Create a reqwest HTTP client with the given request timeout
///
/// - 10 second connect timeout
/// - Reusable across requests
pub fn create_http_client(timeout_secs: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))
}
