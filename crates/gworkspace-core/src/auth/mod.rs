//! Credentials
//!
//! Access tokens are obtained outside this process and only read here: from a
//! token file written by an external OAuth flow, or from the environment.
//! Every Google call goes through [`CredentialProvider::access_token`], which
//! checks that the token belongs to the requested account, carries the scopes
//! the operation declares, and has not expired. Nothing is refreshed.

pub mod provider;
pub mod store;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::common::{AppError, AppResult};

pub use store::TokenStore;

pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SCOPES: &str = "GOOGLE_ACCESS_TOKEN_SCOPES";

// ── Public types ────────────────────────────────────────────────────────────

/// Stored token record
#[derive(Clone, Serialize, Deserialize)]
pub struct TokenRecord {
    /// Google account the token was issued for; empty when unknown.
    #[serde(default)]
    pub account: String,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// RFC 3339 expiry; `None` when the issuer did not say.
    #[serde(default)]
    pub expiry: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

// Custom Debug implementation that redacts the token
impl fmt::Debug for TokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRecord")
            .field("account", &self.account)
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expiry", &self.expiry)
            .field("scopes", &self.scopes)
            .finish()
    }
}

impl TokenRecord {
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// Whether the token names an account other than `account`.
    fn belongs_to_other(&self, account: &str) -> bool {
        !self.account.is_empty() && !self.account.eq_ignore_ascii_case(account)
    }
}

// ── Provider trait ──────────────────────────────────────────────────────────

/// Source of access tokens for Google calls.
pub trait CredentialProvider: Send + Sync {
    /// Load the current token record for `account`.
    fn load(&self, account: &str) -> AppResult<TokenRecord>;

    /// Return a bearer token for `account` that carries every `required` scope.
    fn access_token(&self, account: &str, required: &[&str]) -> AppResult<String> {
        let record = self.load(account)?;

        if record.belongs_to_other(account) {
            warn!(
                "Token is for {} but {} was requested",
                record.account, account
            );
            return Err(AppError::token_not_found(account));
        }

        for scope in required {
            if !record.has_scope(scope) {
                return Err(AppError::scope_insufficient(scope));
            }
        }

        if let Some(expiry) = &record.expiry {
            if is_token_expiring(expiry, 0) {
                return Err(AppError::token_expired(account, expiry));
            }
        }

        debug!("Token for {} covers {} required scopes", account, required.len());
        Ok(record.access_token)
    }
}

/// Token taken from `GOOGLE_ACCESS_TOKEN`.
///
/// When `GOOGLE_ACCESS_TOKEN_SCOPES` is unset the token is taken to carry
/// `granted`, normally the scopes resolved for the enabled tools.
pub struct EnvCredentials {
    record: TokenRecord,
}

impl EnvCredentials {
    pub fn new(record: TokenRecord) -> Self {
        Self { record }
    }

    /// Build from the environment, `None` if no token is set.
    pub fn from_env(granted: &HashSet<&'static str>) -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), granted)
    }

    pub fn from_lookup<F>(lookup: F, granted: &HashSet<&'static str>) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_token = lookup(ENV_ACCESS_TOKEN).filter(|t| !t.is_empty())?;
        let scopes = match lookup(ENV_ACCESS_TOKEN_SCOPES) {
            Some(raw) => raw.split_whitespace().map(String::from).collect(),
            None => granted.iter().map(|s| s.to_string()).collect(),
        };

        Some(Self::new(TokenRecord {
            account: String::new(),
            access_token,
            token_type: default_token_type(),
            expiry: None,
            scopes,
        }))
    }
}

impl CredentialProvider for EnvCredentials {
    fn load(&self, _account: &str) -> AppResult<TokenRecord> {
        Ok(self.record.clone())
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

/// Check whether a token's expiry (RFC 3339) is within `margin_secs` of now.
pub fn is_token_expiring(expiry: &str, margin_secs: i64) -> bool {
    match chrono::DateTime::parse_from_rfc3339(expiry) {
        Ok(exp) => {
            let now = chrono::Utc::now();
            let remaining = exp.signed_duration_since(now).num_seconds();
            remaining < margin_secs
        }
        Err(_) => true, // unparseable ⇒ treat as expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use crate::scopes::{CONTACTS_READONLY_SCOPE, CONTACTS_SCOPE};

    fn record(account: &str, scopes: &[&str], expiry: Option<String>) -> TokenRecord {
        TokenRecord {
            account: account.to_string(),
            access_token: "ya29.test".to_string(),
            token_type: "Bearer".to_string(),
            expiry,
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn in_one_hour() -> Option<String> {
        Some((chrono::Utc::now() + chrono::Duration::hours(1)).to_rfc3339())
    }

    #[test]
    fn test_access_token_with_required_scope() {
        let creds = EnvCredentials::new(record("a@example.com", &[CONTACTS_READONLY_SCOPE], in_one_hour()));
        let token = creds
            .access_token("a@example.com", &[CONTACTS_READONLY_SCOPE])
            .unwrap();
        assert_eq!(token, "ya29.test");
    }

    #[test]
    fn test_missing_scope_is_insufficient() {
        let creds = EnvCredentials::new(record("", &[CONTACTS_READONLY_SCOPE], None));
        let err = creds.access_token("a@example.com", &[CONTACTS_SCOPE]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ScopeInsufficient);
        assert!(err.message.contains(CONTACTS_SCOPE));
    }

    #[test]
    fn test_expired_token_rejected() {
        let past = (chrono::Utc::now() - chrono::Duration::minutes(5)).to_rfc3339();
        let creds = EnvCredentials::new(record("", &[], Some(past)));
        let err = creds.access_token("a@example.com", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }

    #[test]
    fn test_other_account_rejected() {
        let creds = EnvCredentials::new(record("b@example.com", &[], None));
        let err = creds.access_token("a@example.com", &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenNotFound);

        // case-insensitive match is accepted
        assert!(creds.access_token("B@Example.com", &[]).is_ok());
    }

    #[test]
    fn test_env_credentials_default_to_granted_scopes() {
        let granted: HashSet<&'static str> = [CONTACTS_SCOPE].into_iter().collect();
        let creds = EnvCredentials::from_lookup(
            |k| (k == ENV_ACCESS_TOKEN).then(|| "tok".to_string()),
            &granted,
        )
        .unwrap();
        assert!(creds.access_token("x@example.com", &[CONTACTS_SCOPE]).is_ok());

        let none = EnvCredentials::from_lookup(|_| None, &granted);
        assert!(none.is_none());
    }

    #[test]
    fn test_env_scopes_override() {
        let granted: HashSet<&'static str> = [CONTACTS_SCOPE].into_iter().collect();
        let creds = EnvCredentials::from_lookup(
            |k| match k {
                ENV_ACCESS_TOKEN => Some("tok".to_string()),
                ENV_ACCESS_TOKEN_SCOPES => Some(CONTACTS_READONLY_SCOPE.to_string()),
                _ => None,
            },
            &granted,
        )
        .unwrap();
        assert!(creds.access_token("x@example.com", &[CONTACTS_SCOPE]).is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let shown = format!("{:?}", record("a@example.com", &[], None));
        assert!(!shown.contains("ya29.test"));
        assert!(shown.contains("[REDACTED]"));
    }

    #[test]
    fn test_unparseable_expiry_is_expiring() {
        assert!(is_token_expiring("not a date", 0));
    }
}
