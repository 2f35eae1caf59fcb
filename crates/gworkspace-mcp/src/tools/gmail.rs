//! Gmail tools

use gworkspace_core::google::gmail::header;
use gworkspace_core::google::{GmailApi, GoogleClient};
use gworkspace_core::scopes::{self, GMAIL_LABELS_SCOPE, GMAIL_READONLY_SCOPE, GMAIL_SEND_SCOPE};
use gworkspace_core::{AppError, AppResult};
use serde_json::{json, Value};
use tracing::info;

use super::args::{count_with_default, require_string, schema, string_list};
use super::{unknown_handler, ToolDef};

pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "search_gmail_messages",
            group: scopes::GMAIL,
            description: "Searches messages with Gmail query syntax (e.g. 'from:alice is:unread'). \
                          Returns message and thread IDs.",
            required_scopes: &[GMAIL_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({
                    "query": {"type": "string", "description": "Gmail search query."},
                    "page_size": {"type": "integer", "description": "Maximum number of messages.", "default": 10}
                }),
                &["query"],
            ),
        },
        ToolDef {
            name: "get_gmail_message",
            group: scopes::GMAIL,
            description: "Gets the subject, sender, date and snippet of a message.",
            required_scopes: &[GMAIL_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({"message_id": {"type": "string", "description": "The message ID."}}),
                &["message_id"],
            ),
        },
        ToolDef {
            name: "send_gmail_message",
            group: scopes::GMAIL,
            description: "Sends a plain-text email.",
            required_scopes: &[GMAIL_SEND_SCOPE],
            read_only: false,
            input_schema: schema(
                json!({
                    "to": {"type": "array", "items": {"type": "string"}, "description": "Recipient addresses."},
                    "subject": {"type": "string"},
                    "body": {"type": "string", "description": "Plain-text body."},
                    "cc": {"type": "array", "items": {"type": "string"}}
                }),
                &["to", "subject", "body"],
            ),
        },
        ToolDef {
            name: "list_gmail_labels",
            group: scopes::GMAIL,
            description: "Lists the account's Gmail labels with their IDs.",
            required_scopes: &[GMAIL_LABELS_SCOPE],
            read_only: true,
            input_schema: schema(json!({}), &[]),
        },
    ]
}

pub async fn call(name: &str, client: GoogleClient, account: &str, args: &Value) -> AppResult<String> {
    let gmail = GmailApi::new(client);
    match name {
        "search_gmail_messages" => {
            let query = require_string(args, "query")?;
            let page_size = count_with_default(args, "page_size", 10, 100);

            let messages = gmail.search_messages(query, page_size).await?;
            Ok(format_message_list(&messages, query, account))
        }
        "get_gmail_message" => {
            let message_id = require_string(args, "message_id")?;
            let message = gmail.get_message(message_id, "metadata").await?;
            Ok(format_message(&message))
        }
        "send_gmail_message" => {
            let to = string_list(args, "to");
            if to.is_empty() {
                return Err(AppError::invalid_params("Missing required parameter: to"));
            }
            let subject = require_string(args, "subject")?;
            let body = args.get("body").and_then(|v| v.as_str()).ok_or_else(|| {
                AppError::invalid_params("Missing required parameter: body")
            })?;
            let cc = string_list(args, "cc");
            info!("[send_gmail_message] Email: '{}', To: {:?}", account, to);

            let sent = gmail.send_message(&to, subject, body, &cc).await?;
            Ok(format!(
                "Email sent from {} to {}. Message ID: {}",
                account,
                to.join(", "),
                sent.get("id").and_then(|v| v.as_str()).unwrap_or("N/A")
            ))
        }
        "list_gmail_labels" => {
            let labels = gmail.list_labels().await?;
            let lines: Vec<String> = labels
                .iter()
                .map(|l| {
                    format!(
                        "- {} (ID: {})",
                        l.get("name").and_then(|v| v.as_str()).unwrap_or("N/A"),
                        l.get("id").and_then(|v| v.as_str()).unwrap_or("N/A")
                    )
                })
                .collect();
            Ok(format!("Found {} labels for {}:\n{}", labels.len(), account, lines.join("\n")))
        }
        _ => Err(unknown_handler(scopes::GMAIL, name)),
    }
}

fn format_message_list(messages: &[Value], query: &str, account: &str) -> String {
    if messages.is_empty() {
        return format!("No messages found matching '{}' for {}.", query, account);
    }

    let lines: Vec<String> = messages
        .iter()
        .map(|m| {
            format!(
                "- Message ID: {} (Thread ID: {})",
                m.get("id").and_then(|v| v.as_str()).unwrap_or("N/A"),
                m.get("threadId").and_then(|v| v.as_str()).unwrap_or("N/A")
            )
        })
        .collect();

    format!(
        "Found {} messages for {} matching '{}':\n{}",
        messages.len(),
        account,
        query,
        lines.join("\n")
    )
}

fn format_message(message: &Value) -> String {
    format!(
        "Message ID: {}\nSubject: {}\nFrom: {}\nDate: {}\nSnippet: {}",
        message.get("id").and_then(|v| v.as_str()).unwrap_or("N/A"),
        header(message, "Subject").unwrap_or("(no subject)"),
        header(message, "From").unwrap_or("N/A"),
        header(message, "Date").unwrap_or("N/A"),
        message.get("snippet").and_then(|v| v.as_str()).unwrap_or(""),
    )
}
