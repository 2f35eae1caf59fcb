//! Authenticated service handles
//!
//! Each operation declares the scopes it needs and asks for a client here;
//! the credential provider checks the token before any request is sent.

use std::sync::Arc;

use reqwest::Client;
use tracing::debug;

use super::client::GoogleClient;
use crate::auth::CredentialProvider;
use crate::common::{create_http_client, AppResult};

pub struct GoogleServices {
    http: Client,
    credentials: Arc<dyn CredentialProvider>,
}

impl GoogleServices {
    pub fn new(credentials: Arc<dyn CredentialProvider>, timeout_secs: u64) -> AppResult<Self> {
        Ok(Self {
            http: create_http_client(timeout_secs)?,
            credentials,
        })
    }

    /// Client for `account` whose token carries every scope in `required`.
    pub fn require(&self, account: &str, required: &[&str]) -> AppResult<GoogleClient> {
        debug!("Requesting Google service for {} with {:?}", account, required);
        let token = self.credentials.access_token(account, required)?;
        Ok(GoogleClient::new(self.http.clone(), token))
    }
}
