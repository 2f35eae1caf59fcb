//! Google API Authenticated HTTP Client
//!
//! Injects the bearer token and maps Google API REST error envelopes to
//! [`AppError`]. One request per call; failures are reported, not retried.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::common::{AppError, AppResult};

/// Google API HTTP client with OAuth token injection
#[derive(Clone)]
pub struct GoogleClient {
    client: Client,
    access_token: String,
}

impl GoogleClient {
    /// Wrap a shared HTTP client with an OAuth access token
    ///
    /// The reqwest client is cheap to clone; its connection pool is shared.
    pub fn new(client: Client, access_token: String) -> Self {
        Self {
            client,
            access_token,
        }
    }

    /// Make an authenticated GET request
    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> AppResult<Value> {
        let builder = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token);

        self.execute_request(builder).await
    }

    /// Make an authenticated POST request with JSON body
    pub async fn post(&self, url: &str, query: &[(&str, String)], body: &Value) -> AppResult<Value> {
        let builder = self
            .client
            .post(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .json(body);

        self.execute_request(builder).await
    }

    /// Make an authenticated PATCH request with JSON body
    pub async fn patch(&self, url: &str, query: &[(&str, String)], body: &Value) -> AppResult<Value> {
        let builder = self
            .client
            .patch(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .json(body);

        self.execute_request(builder).await
    }

    /// Execute a request and handle Google API response patterns
    async fn execute_request(&self, builder: RequestBuilder) -> AppResult<Value> {
        debug!("Executing Google API request");

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::google_api(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!("Rate limited by Google API");
            return Err(AppError::rate_limited());
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::google_api(format!("Failed to read response body: {}", e)))?;

        // Empty successful responses (e.g., DELETE)
        if status.is_success() && body.is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }

        if !status.is_success() {
            let error_msg = extract_error_message(&body, status);
            error!("Google API error: {}", error_msg);
            return Err(AppError::google_api(error_msg).with_data(serde_json::json!({
                "status": status.as_u16(),
            })));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::google_api(format!("Failed to parse JSON response: {}", e)))
    }
}

/// Extract error message from a Google API error body
///
/// Google APIs return errors as
/// `{"error": {"code": 400, "message": "Invalid request", "errors": [...]}}`.
fn extract_error_message(body: &str, status: StatusCode) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(error_obj) = parsed.as_ref().and_then(|v| v.get("error")) {
        if let Some(message) = error_obj.get("message").and_then(|v| v.as_str()) {
            let code = error_obj
                .get("code")
                .and_then(|v| v.as_i64())
                .unwrap_or(status.as_u16() as i64);

            return format!("Google API error {}: {}", code, message);
        }

        // OAuth-style errors: {"error": "invalid_token", "error_description": "..."}
        if let Some(kind) = error_obj.as_str() {
            let desc = parsed
                .as_ref()
                .and_then(|v| v.get("error_description"))
                .and_then(|v| v.as_str())
                .unwrap_or("no description");
            return format!("Google API error {}: {}: {}", status.as_u16(), kind, desc);
        }
    }

    // Fallback to status code
    format!("HTTP {} error", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_error_message() {
        let body = r#"{"error": {"code": 400, "message": "Invalid request format"}}"#;

        let msg = extract_error_message(body, StatusCode::BAD_REQUEST);
        assert_eq!(msg, "Google API error 400: Invalid request format");
    }

    #[test]
    fn test_extract_oauth_error() {
        let body = r#"{"error": "invalid_token", "error_description": "Token expired"}"#;

        let msg = extract_error_message(body, StatusCode::UNAUTHORIZED);
        assert_eq!(msg, "Google API error 401: invalid_token: Token expired");
    }

    #[test]
    fn test_extract_error_fallback() {
        let msg = extract_error_message("<html>oops</html>", StatusCode::BAD_GATEWAY);
        assert!(msg.contains("502"));
    }
}
