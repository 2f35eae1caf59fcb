//! Google Drive API v3 Client
//!
//! Read-only file lookup: search by Drive query and fetch file metadata.

use super::client::GoogleClient;
use super::common::{extract_array, path_segment};
use crate::common::AppResult;
use serde_json::Value;
use tracing::{debug, info};

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

const FILE_FIELDS: &str = "id,name,mimeType,size,modifiedTime,webViewLink";

pub struct DriveApi {
    client: GoogleClient,
    base_url: String,
}

super::google_api_wrapper!(DriveApi, DRIVE_API_BASE);

impl DriveApi {
    /// Search files with a Drive query
    ///
    /// Plain text (no operators) is turned into a `fullText contains` query.
    pub async fn search_files(&self, query: &str, page_size: u32) -> AppResult<Vec<Value>> {
        info!("Searching Drive files: {}", query);

        let url = format!("{}/files", self.base_url);
        let response = self
            .client
            .get(
                &url,
                &[
                    ("q", drive_query(query)),
                    ("pageSize", page_size.to_string()),
                    ("fields", format!("files({})", FILE_FIELDS)),
                    ("supportsAllDrives", "true".to_string()),
                    ("includeItemsFromAllDrives", "true".to_string()),
                ],
            )
            .await?;

        let files = extract_array(&response, "files");
        debug!("Retrieved {} files", files.len());
        Ok(files)
    }

    /// Get file metadata by ID
    pub async fn get_file(&self, file_id: &str) -> AppResult<Value> {
        info!("Fetching Drive file: {}", file_id);

        let url = format!("{}/files/{}", self.base_url, path_segment(file_id));
        self.client
            .get(
                &url,
                &[
                    ("fields", format!("{},owners(emailAddress)", FILE_FIELDS)),
                    ("supportsAllDrives", "true".to_string()),
                ],
            )
            .await
    }
}

/// Terms that can start a Drive query clause.
const QUERY_FIELDS: &[&str] = &[
    "name",
    "fullText",
    "mimeType",
    "modifiedTime",
    "viewedByMeTime",
    "createdTime",
    "trashed",
    "starred",
    "parents",
    "owners",
    "writers",
    "readers",
    "sharedWithMe",
    "properties",
    "appProperties",
    "visibility",
];

const QUERY_OPERATORS: &[&str] = &["contains", "=", "!=", "<", "<=", ">", ">=", "in", "has"];

/// Pass structured queries through; wrap free text in `fullText contains`.
fn drive_query(query: &str) -> String {
    if is_structured_query(query) {
        query.to_string()
    } else {
        format!("fullText contains '{}'", query.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

/// True when the query has a `<field> <operator>` clause (`trashed = false`,
/// `trashed=false`) or a `<value> in <field>` clause (`'root' in parents`).
fn is_structured_query(query: &str) -> bool {
    let is_field = |t: &str| QUERY_FIELDS.contains(&t);
    let tokens: Vec<&str> = query
        .split_whitespace()
        .map(|t| t.trim_start_matches('(').trim_start_matches("not("))
        .collect();

    let glued = tokens.iter().any(|t| {
        QUERY_FIELDS.iter().any(|f| {
            t.strip_prefix(f)
                .is_some_and(|rest| ["=", "!=", "<", ">"].iter().any(|op| rest.starts_with(op)))
        })
    });

    glued
        || tokens.windows(2).any(|w| {
            (is_field(w[0]) && QUERY_OPERATORS.contains(&w[1]))
                || (w[0] == "in" && is_field(w[1].trim_end_matches(')')))
        })
}
