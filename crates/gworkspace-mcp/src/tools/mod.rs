//! Tool registry
//!
//! Tools are defined per group (contacts, gmail, drive, calendar, tasks).
//! Only groups enabled in the scope resolver are listed and callable. Each
//! tool declares the scopes it needs; a service handle is requested with
//! those scopes before the handler runs.

mod args;
mod calendar;
mod contacts;
mod drive;
mod gmail;
mod tasks;

use std::collections::HashMap;

use gworkspace_core::google::{GoogleClient, GoogleServices};
use gworkspace_core::scopes;
use gworkspace_core::{AppError, AppResult, ErrorCode, ScopeResolver};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::protocol::{McpTool, ToolAnnotations, ToolsCallResponse, ToolsListResponse};

/// A single callable operation.
#[derive(Debug, Clone)]
pub struct ToolDef {
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub required_scopes: &'static [&'static str],
    pub read_only: bool,
    pub input_schema: Value,
}

impl ToolDef {
    fn to_mcp(&self) -> McpTool {
        McpTool {
            name: self.name.to_string(),
            description: self.description.to_string(),
            input_schema: self.input_schema.clone(),
            annotations: Some(ToolAnnotations {
                title: None,
                read_only_hint: self.read_only,
                destructive_hint: false,
                idempotent_hint: self.read_only,
                open_world_hint: true,
            }),
        }
    }
}

/// Every tool this server knows, regardless of selection.
pub fn all_definitions() -> Vec<ToolDef> {
    let mut defs = Vec::new();
    defs.extend(contacts::definitions());
    defs.extend(gmail::definitions());
    defs.extend(drive::definitions());
    defs.extend(calendar::definitions());
    defs.extend(tasks::definitions());
    defs
}

#[derive(Debug)]
pub enum ToolCallError {
    UnknownTool(String),
    InvalidParams(String),
}

pub struct ToolRegistry {
    tools: Vec<ToolDef>,
    index: HashMap<&'static str, usize>,
    services: GoogleServices,
}

impl ToolRegistry {
    /// Build the registry with the tools of every enabled group.
    pub fn new(resolver: &ScopeResolver, services: GoogleServices) -> anyhow::Result<Self> {
        let mut tools: Vec<ToolDef> = all_definitions()
            .into_iter()
            .filter(|def| resolver.is_enabled(def.group))
            .collect();
        tools.sort_by(|a, b| a.name.cmp(b.name));

        let mut index = HashMap::new();
        for (i, def) in tools.iter().enumerate() {
            if index.insert(def.name, i).is_some() {
                anyhow::bail!("duplicate tool name: {}", def.name);
            }
        }

        info!("Registered {} tools", tools.len());
        Ok(Self {
            tools,
            index,
            services,
        })
    }

    pub fn list_response(&self) -> ToolsListResponse {
        ToolsListResponse {
            tools: self.tools.iter().map(ToolDef::to_mcp).collect(),
            next_cursor: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolsCallResponse, ToolCallError> {
        let Some(def) = self.index.get(name).map(|i| &self.tools[*i]) else {
            return Err(ToolCallError::UnknownTool(name.to_string()));
        };

        info!("[{}] Invoked", def.name);
        match self.invoke(def, &arguments).await {
            Ok(text) => Ok(ToolsCallResponse::text(text)),
            Err(e) if e.code == ErrorCode::InvalidParams => {
                warn!("[{}] Invalid arguments: {}", def.name, e.message);
                Err(ToolCallError::InvalidParams(e.message))
            }
            Err(e) => {
                error!("[{}] Failed: {}", def.name, e);
                Ok(ToolsCallResponse::failure(format!("{} failed: {}", def.name, e.message)))
            }
        }
    }

    async fn invoke(&self, def: &ToolDef, args: &Value) -> AppResult<String> {
        let account = args::require_string(args, "user_google_email")?;
        let client: GoogleClient = self.services.require(account, def.required_scopes)?;

        match def.group {
            scopes::CONTACTS => contacts::call(def.name, client, account, args).await,
            scopes::GMAIL => gmail::call(def.name, client, account, args).await,
            scopes::DRIVE => drive::call(def.name, client, account, args).await,
            scopes::CALENDAR => calendar::call(def.name, client, account, args).await,
            scopes::TASKS => tasks::call(def.name, client, account, args).await,
            other => Err(unknown_handler(other, def.name)),
        }
    }
}

fn unknown_handler(group: &str, name: &str) -> AppError {
    AppError::new(
        ErrorCode::MethodNotFound,
        format!("no handler for {}.{}", group, name),
    )
}
