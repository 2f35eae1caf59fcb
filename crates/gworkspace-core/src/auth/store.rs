//! Token Store
//!
//! File-based token lookup at `~/.gworkspace/token.json` (configurable).
//! The file holds one [`TokenRecord`] as JSON. It is re-read on every call
//! so a token rewritten by an external authorization flow is picked up
//! without restarting.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{CredentialProvider, TokenRecord};
use crate::common::{AppError, AppResult};

pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the token file.
    pub fn read(&self) -> AppResult<Option<TokenRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&self.path).map_err(|e| {
            AppError::internal(format!("Failed to read token file {:?}: {}", self.path, e))
        })?;
        let record: TokenRecord = serde_json::from_str(&data).map_err(|e| {
            AppError::config(format!("Failed to parse token file {:?}: {}", self.path, e))
        })?;

        debug!("Loaded token from {:?}: {:?}", self.path, record);
        Ok(Some(record))
    }
}

impl CredentialProvider for TokenStore {
    fn load(&self, account: &str) -> AppResult<TokenRecord> {
        self.read()?
            .ok_or_else(|| AppError::token_not_found(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;

    #[test]
    fn test_missing_file_is_token_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::new(dir.path().join("token.json"));

        assert!(store.read().unwrap().is_none());
        let err = store.load("a@example.com").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenNotFound);
    }

    #[test]
    fn test_reads_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(
            &path,
            r#"{
                "account": "a@example.com",
                "access_token": "ya29.file",
                "scopes": ["openid"]
            }"#,
        )
        .unwrap();

        let store = TokenStore::new(&path);
        let record = store.load("a@example.com").unwrap();
        assert_eq!(record.token_type, "Bearer");
        assert!(record.expiry.is_none());
        assert_eq!(store.access_token("a@example.com", &["openid"]).unwrap(), "ya29.file");
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, "[]").unwrap();

        let err = TokenStore::new(&path).read().unwrap_err();
        assert_eq!(err.code, ErrorCode::Config);
    }
}
