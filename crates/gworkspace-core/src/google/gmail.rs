//! Gmail API v1 Client
//!
//! Provides methods for interacting with Gmail API:
//! - Search messages
//! - Get message details
//! - Send emails
//! - List labels

use super::client::GoogleClient;
use super::common::{extract_array, path_segment};
use crate::common::{AppError, AppResult};
use serde_json::{json, Value};
use tracing::{debug, info};

const GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1";

pub struct GmailApi {
    client: GoogleClient,
    base_url: String,
}

super::google_api_wrapper!(GmailApi, GMAIL_API_BASE);

impl GmailApi {
    /// Search messages with a Gmail query (same syntax as the web UI)
    ///
    /// # Returns
    /// Array of message stubs with id and threadId
    pub async fn search_messages(&self, query: &str, max_results: u32) -> AppResult<Vec<Value>> {
        info!("Searching Gmail messages: {}", query);

        let url = format!("{}/users/me/messages", self.base_url);
        let response = self
            .client
            .get(
                &url,
                &[("q", query.to_string()), ("maxResults", max_results.to_string())],
            )
            .await?;

        let messages = extract_array(&response, "messages");
        debug!("Retrieved {} messages", messages.len());
        Ok(messages)
    }

    /// Get a message by ID
    ///
    /// # Arguments
    /// * `id` - Message ID
    /// * `format` - "full", "metadata", "minimal" or "raw"
    pub async fn get_message(&self, id: &str, format: &str) -> AppResult<Value> {
        info!("Fetching Gmail message: {}", id);

        let url = format!("{}/users/me/messages/{}", self.base_url, path_segment(id));
        self.client.get(&url, &[("format", format.to_string())]).await
    }

    /// Send a plain-text email
    ///
    /// # Returns
    /// Sent message object with id and threadId
    pub async fn send_message(
        &self,
        to: &[String],
        subject: &str,
        body: &str,
        cc: &[String],
    ) -> AppResult<Value> {
        info!("Sending Gmail message to: {:?}", to);

        let raw = base64_url_encode(build_rfc2822(to, subject, body, cc)?.as_bytes());

        let url = format!("{}/users/me/messages/send", self.base_url);
        let response = self.client.post(&url, &[], &json!({ "raw": raw })).await?;

        info!("Message sent successfully");
        Ok(response)
    }

    /// List all labels
    pub async fn list_labels(&self) -> AppResult<Vec<Value>> {
        info!("Listing Gmail labels");

        let url = format!("{}/users/me/labels", self.base_url);
        let response = self.client.get(&url, &[]).await?;

        let labels = extract_array(&response, "labels");
        debug!("Retrieved {} labels", labels.len());
        Ok(labels)
    }
}

/// Build a minimal RFC 2822 plain-text message.
///
/// Header values must not contain CR or LF. A non-ASCII subject is sent as an
/// RFC 2047 encoded-word.
fn build_rfc2822(to: &[String], subject: &str, body: &str, cc: &[String]) -> AppResult<String> {
    for value in to.iter().chain(cc).map(String::as_str).chain([subject]) {
        if value.contains(['\r', '\n']) {
            return Err(AppError::invalid_params(
                "Header values (to, cc, subject) must not contain line breaks",
            ));
        }
    }

    let mut parts = vec![
        format!("To: {}", to.join(", ")),
        format!("Subject: {}", encode_header_value(subject)),
    ];

    if !cc.is_empty() {
        parts.push(format!("Cc: {}", cc.join(", ")));
    }

    parts.push("MIME-Version: 1.0".to_string());
    parts.push("Content-Type: text/plain; charset=UTF-8".to_string());
    parts.push(String::new()); // Empty line separates headers from body
    parts.push(body.to_string());

    Ok(parts.join("\r\n"))
}

/// ASCII passes through; anything else becomes `=?UTF-8?B?...?=`.
fn encode_header_value(value: &str) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};
    if value.is_ascii() {
        value.to_string()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(value.as_bytes()))
    }
}

/// Look up a header value (case-insensitive) in a message payload.
pub fn header<'a>(message: &'a Value, name: &str) -> Option<&'a str> {
    message
        .get("payload")?
        .get("headers")?
        .as_array()?
        .iter()
        .find(|h| {
            h.get("name")
                .and_then(|n| n.as_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
        })
        .and_then(|h| h.get("value"))
        .and_then(|v| v.as_str())
}

/// Base64url encode (no padding) per RFC 4648 §5
fn base64_url_encode(data: &[u8]) -> String {
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    URL_SAFE_NO_PAD.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_url_encode() {
        let encoded = base64_url_encode(b"Hello, World!??>>");
        assert!(!encoded.contains('='));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
    }

    #[test]
    fn test_build_rfc2822() {
        let msg = build_rfc2822(
            &["a@example.com".to_string(), "b@example.com".to_string()],
            "Hi",
            "Body text",
            &[],
        )
        .unwrap();
        assert!(msg.starts_with("To: a@example.com, b@example.com\r\nSubject: Hi\r\n"));
        assert!(!msg.contains("Cc:"));
        assert!(msg.ends_with("\r\n\r\nBody text"));
    }

    #[test]
    fn test_build_rfc2822_rejects_header_injection() {
        let to = vec!["a@example.com".to_string()];

        let err = build_rfc2822(&to, "Hi\r\nBcc: evil@attacker.test", "body", &[]).unwrap_err();
        assert_eq!(err.code, crate::common::ErrorCode::InvalidParams);

        let cc = vec!["c@example.com\nBcc: evil@attacker.test".to_string()];
        assert!(build_rfc2822(&to, "Hi", "body", &cc).is_err());

        let bad_to = vec!["a@example.com\r\nBcc: x@y.test".to_string()];
        assert!(build_rfc2822(&bad_to, "Hi", "body", &[]).is_err());
    }

    #[test]
    fn test_build_rfc2822_body_may_span_lines() {
        let to = vec!["a@example.com".to_string()];
        let msg = build_rfc2822(&to, "Hi", "line one\r\nBcc: not a header", &[]).unwrap();
        let headers = msg.split("\r\n\r\n").next().unwrap();
        assert!(!headers.lines().any(|l| l.starts_with("Bcc:")));
    }

    #[test]
    fn test_build_rfc2822_encodes_non_ascii_subject() {
        let to = vec!["a@example.com".to_string()];
        let msg = build_rfc2822(&to, "Grüße", "body", &[]).unwrap();

        assert!(msg.is_ascii());
        assert!(msg.contains("Subject: =?UTF-8?B?R3LDvMOfZQ==?=\r\n"));
    }

    #[test]
    fn test_header_lookup() {
        let message = json!({
            "payload": {"headers": [
                {"name": "Subject", "value": "Quarterly"},
                {"name": "From", "value": "boss@example.com"}
            ]}
        });
        assert_eq!(header(&message, "subject"), Some("Quarterly"));
        assert_eq!(header(&message, "To"), None);
        assert_eq!(header(&json!({}), "From"), None);
    }
}
