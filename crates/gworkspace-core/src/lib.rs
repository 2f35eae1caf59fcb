//! Google Workspace tool support: OAuth scope resolution, credentials,
//! configuration, and thin REST wrappers for People, Gmail, Drive, Calendar
//! and Tasks.

pub mod auth;
pub mod common;
pub mod config;
pub mod google;
pub mod scopes;

pub use common::{AppError, AppResult, ErrorCode};
pub use config::AppConfig;
pub use scopes::ScopeResolver;
