//! Common Error Types
//!
//! Unified error handling with JSON-RPC error code mapping.

use thiserror::Error;

/// JSON-RPC error codes
///
/// Standard codes: -32768 to -32000
/// Custom codes: -32099 to -32000
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Standard JSON-RPC errors
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,

    // Credentials
    TokenNotFound = -32010,
    TokenExpired = -32011,
    ScopeInsufficient = -32012,

    // Google API
    GoogleApi = -32020,
    RateLimited = -32021,
    PreconditionFailed = -32022,

    // Configuration
    Config = -32030,

    // Generic application error
    GenericError = -32000,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        *self as i32
    }
}

/// Application error type with JSON-RPC code
#[derive(Debug, Error)]
#[error("[{}] {message}", .code.code())]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidParams, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a token not found error
    pub fn token_not_found(account: &str) -> Self {
        Self::new(
            ErrorCode::TokenNotFound,
            format!("No Google token available for {}", account),
        )
    }

    /// Create a token expired error
    pub fn token_expired(account: &str, expiry: &str) -> Self {
        Self::new(
            ErrorCode::TokenExpired,
            format!(
                "Token for {} expired at {}; re-authorize with --auth-url",
                account, expiry
            ),
        )
    }

    /// Create a scope insufficient error
    pub fn scope_insufficient(scope: &str) -> Self {
        Self::new(
            ErrorCode::ScopeInsufficient,
            format!("Token missing scope: {}", scope),
        )
    }

    pub fn google_api(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GoogleApi, message)
    }

    pub fn rate_limited() -> Self {
        Self::new(ErrorCode::RateLimited, "Rate limited. Please try again later.")
    }

    /// A required precondition for a remote write was not met.
    pub fn precondition_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PreconditionFailed, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Config, message)
    }
}

impl From<String> for AppError {
    fn from(message: String) -> Self {
        Self::new(ErrorCode::GenericError, message)
    }
}

impl From<&str> for AppError {
    fn from(message: &str) -> Self {
        Self::new(ErrorCode::GenericError, message)
    }
}
