mod initialize;
mod protocol;
mod tools;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gworkspace_core::auth::provider::google::GoogleProvider;
use gworkspace_core::auth::provider::OAuthProvider;
use gworkspace_core::auth::{CredentialProvider, EnvCredentials, TokenStore};
use gworkspace_core::config::parse_tool_list;
use gworkspace_core::google::GoogleServices;
use gworkspace_core::scopes::sorted;
use gworkspace_core::{AppConfig, ErrorCode, ScopeResolver};

use protocol::{InitializeRequest, JsonRpcRequest, JsonRpcResponse, ToolsCallRequest};
use tools::{ToolCallError, ToolRegistry};

#[derive(Parser, Debug)]
#[command(name = "gworkspace-mcp", version, about = "Google Workspace tools over MCP")]
struct Args {
    #[arg(long, default_value = "stdio")]
    transport: String,

    /// Tool groups to enable, e.g. "gmail,calendar". Defaults to all.
    #[arg(long)]
    tools: Option<String>,

    /// Config file (default: ~/.gworkspace/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the OAuth scopes for the enabled tools and exit
    #[arg(long)]
    print_scopes: bool,

    /// Print a consent URL requesting the enabled tools' scopes and exit
    #[arg(long)]
    auth_url: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries the protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    if args.transport != "stdio" {
        anyhow::bail!("only stdio transport is supported");
    }

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(raw) = args.tools.as_deref() {
        let tools = parse_tool_list(raw);
        if tools.is_empty() {
            warn!("--tools names no tools; ignoring it");
        } else {
            config.enabled_tools = Some(tools);
        }
    }

    let resolver = Arc::new(ScopeResolver::new());
    if let Some(selection) = config.enabled_tools.clone() {
        resolver.set_enabled_tools(selection);
    }
    if resolver.selection().is_none() {
        info!("No tool selection configured; enabling every tool group");
    }
    let scopes = resolver.current_scopes();

    if args.print_scopes {
        for scope in sorted(&scopes) {
            println!("{}", scope);
        }
        return Ok(());
    }

    if args.auth_url {
        let oauth = config.oauth()?;
        let request = GoogleProvider::from_config(oauth).authorization_request(&sorted(&scopes), &oauth.redirect_uri);
        println!("{}", request.url);
        eprintln!("state: {}", request.state);
        eprintln!("code_verifier: {}", request.code_verifier);
        return Ok(());
    }

    let credentials: Arc<dyn CredentialProvider> = match EnvCredentials::from_env(&scopes) {
        Some(env) => {
            info!("Using access token from environment");
            Arc::new(env)
        }
        None => {
            let store = TokenStore::new(config.token_path()?);
            if !store.path().exists() {
                warn!("No token file at {:?}; tool calls will fail until one is written", store.path());
            }
            Arc::new(store)
        }
    };

    let services = GoogleServices::new(credentials, config.http_timeout_secs)?;
    let registry = ToolRegistry::new(&resolver, services)?;

    let mut groups: Vec<String> = resolver.enabled_tools().into_iter().collect();
    groups.sort();
    info!("gworkspace-mcp ready: {} tools across {:?}", registry.len(), groups);

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut stdout = tokio::io::stdout();
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let request = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
            Ok(req) => req,
            Err(e) => {
                let resp = JsonRpcResponse::error(
                    serde_json::Value::Null,
                    ErrorCode::ParseError,
                    format!("parse error: {}", e),
                );
                stdout.write_all(serde_json::to_string(&resp)?.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
                continue;
            }
        };

        let Some(id) = request.id.clone() else {
            // Notifications get no response
            continue;
        };

        let response = match request.method.as_str() {
            "initialize" => match serde_json::from_value::<InitializeRequest>(request.params) {
                Ok(init_req) => {
                    let result = initialize::handle_initialize(init_req, &groups);
                    JsonRpcResponse::success(id, serde_json::to_value(result)?)
                }
                Err(e) => JsonRpcResponse::error(
                    id,
                    ErrorCode::InvalidParams,
                    format!("invalid initialize params: {}", e),
                ),
            },
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(id, serde_json::to_value(registry.list_response())?),
            "tools/call" => match serde_json::from_value::<ToolsCallRequest>(request.params) {
                Ok(call_req) => match registry.call_tool(&call_req.name, call_req.arguments).await {
                    Ok(result) => JsonRpcResponse::success(id, serde_json::to_value(result)?),
                    Err(ToolCallError::UnknownTool(name)) => {
                        JsonRpcResponse::error(id, ErrorCode::MethodNotFound, format!("unknown tool: {}", name))
                    }
                    Err(ToolCallError::InvalidParams(msg)) => {
                        JsonRpcResponse::error(id, ErrorCode::InvalidParams, msg)
                    }
                },
                Err(e) => JsonRpcResponse::error(
                    id,
                    ErrorCode::InvalidParams,
                    format!("invalid tools/call params: {}", e),
                ),
            },
            _ => JsonRpcResponse::error(
                id,
                ErrorCode::MethodNotFound,
                format!("method not found: {}", request.method),
            ),
        };

        stdout.write_all(serde_json::to_string(&response)?.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }

    info!("stdin closed, shutting down");
    Ok(())
}
