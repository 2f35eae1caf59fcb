//! Drive tools

use gworkspace_core::google::{DriveApi, GoogleClient};
use gworkspace_core::scopes::{self, DRIVE_READONLY_SCOPE};
use gworkspace_core::AppResult;
use serde_json::{json, Value};

use super::args::{count_with_default, require_string, schema};
use super::{unknown_handler, ToolDef};

pub fn definitions() -> Vec<ToolDef> {
    vec![
        ToolDef {
            name: "search_drive_files",
            group: scopes::DRIVE,
            description: "Searches Drive files. Accepts free text or Drive query syntax \
                          (e.g. \"name contains 'report'\").",
            required_scopes: &[DRIVE_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(
                json!({
                    "query": {"type": "string"},
                    "page_size": {"type": "integer", "default": 10}
                }),
                &["query"],
            ),
        },
        ToolDef {
            name: "get_drive_file",
            group: scopes::DRIVE,
            description: "Gets metadata (name, type, size, owners, link) for a Drive file.",
            required_scopes: &[DRIVE_READONLY_SCOPE],
            read_only: true,
            input_schema: schema(json!({"file_id": {"type": "string"}}), &["file_id"]),
        },
    ]
}

pub async fn call(name: &str, client: GoogleClient, account: &str, args: &Value) -> AppResult<String> {
    let drive = DriveApi::new(client);
    match name {
        "search_drive_files" => {
            let query = require_string(args, "query")?;
            let page_size = count_with_default(args, "page_size", 10, 100);

            let files = drive.search_files(query, page_size).await?;
            if files.is_empty() {
                return Ok(format!("No files found matching '{}' for {}.", query, account));
            }

            let lines: Vec<String> = files.iter().map(format_file).collect();
            Ok(format!(
                "Found {} files for {} matching '{}':\n{}",
                files.len(),
                account,
                query,
                lines.join("\n")
            ))
        }
        "get_drive_file" => {
            let file_id = require_string(args, "file_id")?;
            let file = drive.get_file(file_id).await?;

            let owners: Vec<&str> = file
                .get("owners")
                .and_then(|v| v.as_array())
                .map(|o| o.iter().filter_map(|p| p.get("emailAddress").and_then(|v| v.as_str())).collect())
                .unwrap_or_default();

            Ok(format!(
                "{}\n  Size: {}\n  Owners: {}",
                format_file(&file),
                file.get("size").and_then(|v| v.as_str()).unwrap_or("N/A"),
                if owners.is_empty() { "N/A".to_string() } else { owners.join(", ") }
            ))
        }
        _ => Err(unknown_handler(scopes::DRIVE, name)),
    }
}

fn format_file(file: &Value) -> String {
    let field = |key: &str| file.get(key).and_then(|v| v.as_str()).unwrap_or("N/A");
    format!(
        "- Name: \"{}\" (ID: {}, Type: {}, Modified: {})\n  Link: {}",
        field("name"),
        field("id"),
        field("mimeType"),
        field("modifiedTime"),
        field("webViewLink"),
    )
}
