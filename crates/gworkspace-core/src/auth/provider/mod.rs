//! OAuth Provider Abstraction
//!
//! Only the authorization request is built here. Exchanging the returned
//! code and refreshing tokens happen outside this process.

pub mod google;

use serde::{Deserialize, Serialize};

/// Everything needed to send a user through the consent screen and later
/// finish the PKCE exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
    pub code_verifier: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
}

/// OAuth provider trait.
pub trait OAuthProvider {
    /// Provider name (e.g. "google")
    fn name(&self) -> &str;

    /// Build the authorization URL for the PKCE flow.
    fn authorize_url(
        &self,
        scopes: &[&str],
        state: &str,
        code_challenge: &str,
        redirect_uri: &str,
    ) -> String;

    /// Generate state and PKCE material, then build the authorization URL.
    fn authorization_request(&self, scopes: &[&str], redirect_uri: &str) -> AuthorizationRequest {
        let state = google::generate_state();
        let code_verifier = google::generate_code_verifier();
        let challenge = google::generate_code_challenge(&code_verifier);

        AuthorizationRequest {
            url: self.authorize_url(scopes, &state, &challenge, redirect_uri),
            state,
            code_verifier,
            redirect_uri: redirect_uri.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
        }
    }
}
