//! Google OAuth2 Provider
//!
//! Builds the PKCE Authorization Code request for Google APIs.

use tracing::info;

use super::OAuthProvider;
use crate::config::GoogleOAuthConfig;

const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth2 provider.
pub struct GoogleProvider {
    pub client_id: String,
}

impl GoogleProvider {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
        }
    }

    pub fn from_config(config: &GoogleOAuthConfig) -> Self {
        Self::new(config.client_id.clone())
    }
}

impl OAuthProvider for GoogleProvider {
    fn name(&self) -> &str {
        "google"
    }

    fn authorize_url(
        &self,
        scopes: &[&str],
        state: &str,
        code_challenge: &str,
        redirect_uri: &str,
    ) -> String {
        info!("Building Google authorization URL for {} scopes", scopes.len());

        let scope_str = scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&code_challenge={}&code_challenge_method=S256&access_type=offline&prompt=consent",
            AUTH_ENDPOINT,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scope_str),
            urlencoding::encode(state),
            urlencoding::encode(code_challenge),
        )
    }
}

// ── PKCE Utilities ──────────────────────────────────────────────────────────

/// Generate a PKCE code verifier (43-128 characters of unreserved URI characters).
pub fn generate_code_verifier() -> String {
    random_token()
}

/// Derive the PKCE code challenge from a code verifier using S256.
pub fn generate_code_challenge(verifier: &str) -> String {
    use sha2::{Digest, Sha256};
    let hash = Sha256::digest(verifier.as_bytes());
    base64_url_encode(&hash)
}

/// Random anti-CSRF state value.
pub fn generate_state() -> String {
    random_token()
}

fn random_token() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    base64_url_encode(&bytes)
}

/// Base64url encoding (no padding) per RFC 4648 §5.
fn base64_url_encode(data: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(data)
}
