use tracing::info;

use crate::protocol::{
    InitializeRequest, InitializeResponse, ServerCapabilities, ServerInfo, ToolsCapabilities,
    MCP_PROTOCOL_VERSION,
};

pub fn handle_initialize(request: InitializeRequest, enabled_groups: &[String]) -> InitializeResponse {
    info!(
        "Client {} {} connected (protocol {})",
        request.client_info.name, request.client_info.version, request.protocol_version
    );

    InitializeResponse {
        // Accept any client protocol version; the client adapts to ours
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapabilities { list_changed: false },
        },
        server_info: ServerInfo {
            name: "gworkspace-mcp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        instructions: format!(
            "Google Workspace tools for: {}. Every tool takes user_google_email, the account to act as. \
             Use search_contacts to find a contact's resource name before update_contact_email, \
             and confirm with the user before sending mail or creating records.",
            enabled_groups.join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::ClientInfo;

    #[test]
    fn test_initialize_reports_server_version() {
        let request = InitializeRequest {
            protocol_version: "2024-11-05".to_string(),
            capabilities: serde_json::json!({}),
            client_info: ClientInfo {
                name: "test".to_string(),
                version: "1.0".to_string(),
            },
        };

        let resp = handle_initialize(request, &["contacts".to_string(), "gmail".to_string()]);
        assert_eq!(resp.protocol_version, MCP_PROTOCOL_VERSION);
        assert_eq!(resp.server_info.name, "gworkspace-mcp");
        assert!(resp.instructions.contains("contacts, gmail"));
    }
}
