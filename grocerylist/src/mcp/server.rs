//! MCP server implementation for serving the grocery list tools

use super::tool_registry::{register_grocery_tools, ToolContext, ToolRegistry};
use crate::grocery::GroceryList;
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use std::sync::Arc;

/// MCP server exposing the grocery list as tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a new MCP server for the given grocery list
    pub fn new(grocery: GroceryList) -> Self {
        let mut tool_registry = ToolRegistry::new();
        register_grocery_tools(&mut tool_registry);
        tracing::debug!("Registered {} MCP tool(s)", tool_registry.len());

        Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(Arc::new(grocery))),
        }
    }

    /// The registered tools
    pub fn tool_registry(&self) -> &ToolRegistry {
        &self.tool_registry
    }

    /// Execute a tool by name
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: serde_json::Map<String, serde_json::Value>,
    ) -> std::result::Result<CallToolResult, McpError> {
        match self.tool_registry.get_tool(name) {
            Some(tool) => tool.execute(arguments, &self.tool_context).await,
            None => Err(McpError::invalid_request(
                format!("Unknown tool: {name}"),
                None,
            )),
        }
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        self.call_tool_by_name(&request.name, request.arguments.unwrap_or_default())
            .await
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: None,
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: "grocerylist".into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(
                "A grocery shopping list kept in dstask. Use the grocery_list tool to list, add, mark as bought, remove, or clear bought items."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dstask::DstaskVerb;
    use crate::test_utils::{test_list, MockRunner};

    #[test]
    fn test_server_info_advertises_tools_only() {
        let server = McpServer::new(test_list(Arc::new(MockRunner::new())));
        let info = server.get_info();

        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.prompts.is_none());
        assert!(info.capabilities.resources.is_none());
        assert_eq!(info.server_info.name, "grocerylist");
        assert_eq!(info.server_info.version, crate::VERSION);
    }

    #[test]
    fn test_server_registers_grocery_tool() {
        let server = McpServer::new(test_list(Arc::new(MockRunner::new())));
        assert_eq!(server.tool_registry().list_tool_names(), vec!["grocery_list"]);
    }

    #[tokio::test]
    async fn test_call_tool_by_name() {
        let runner = Arc::new(MockRunner::new().respond(DstaskVerb::ShowResolved, "[]"));
        let server = McpServer::new(test_list(runner));

        let mut arguments = serde_json::Map::new();
        arguments.insert("action".to_string(), serde_json::json!("clear"));

        let result = server
            .call_tool_by_name("grocery_list", arguments)
            .await
            .unwrap();
        assert_eq!(result.is_error, Some(false));
    }

    #[tokio::test]
    async fn test_unknown_tool_is_rejected() {
        let server = McpServer::new(test_list(Arc::new(MockRunner::new())));
        let err = server
            .call_tool_by_name("shopping_cart", serde_json::Map::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("Unknown tool: shopping_cart"));
    }
}
