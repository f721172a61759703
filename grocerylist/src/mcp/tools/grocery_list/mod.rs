//! Grocery list tool for MCP operations
//!
//! A single tool multiplexes the five grocery operations over an `action`
//! argument.

use crate::grocery::GroceryAction;
use crate::mcp::shared_utils::McpErrorHandler;
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use async_trait::async_trait;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;
use serde::Deserialize;

/// Arguments accepted by the `grocery_list` tool
#[derive(Debug, Deserialize)]
pub struct GroceryListRequest {
    /// One of list, add, done, remove, clear
    pub action: String,
    /// Item description for `add`
    #[serde(default)]
    pub item: Option<String>,
    /// Item id for `done` and `remove`
    #[serde(default)]
    pub id: Option<String>,
}

/// Tool for managing the grocery list
#[derive(Default)]
pub struct GroceryListTool;

impl GroceryListTool {
    /// Creates a new instance of the GroceryListTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GroceryListTool {
    fn name(&self) -> &'static str {
        "grocery_list"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "action": {
                    "type": "string",
                    "enum": GroceryAction::NAMES,
                    "description": "Action to perform: list (show pending), add (new item), done (mark bought), remove (delete item), clear (remove all bought)"
                },
                "item": {
                    "type": "string",
                    "description": "Item description (for 'add' action)"
                },
                "id": {
                    "type": "string",
                    "description": "Item ID (for 'done' or 'remove' actions)"
                }
            },
            "required": ["action"]
        })
    }

    async fn execute(
        &self,
        arguments: serde_json::Map<String, serde_json::Value>,
        context: &ToolContext,
    ) -> std::result::Result<CallToolResult, McpError> {
        let request: GroceryListRequest = BaseToolImpl::parse_arguments(arguments)?;
        tracing::debug!("grocery_list called with action '{}'", request.action);

        let action = match GroceryAction::from_request(
            &request.action,
            request.item.as_deref(),
            request.id.as_deref(),
        ) {
            Ok(action) => action,
            Err(e) => return McpErrorHandler::tool_result(e, &request.action),
        };

        match context.grocery.clone().execute_blocking(action).await {
            Ok(outcome) => Ok(BaseToolImpl::create_success_response(
                outcome.to_plain_text(),
            )),
            Err(e) => McpErrorHandler::tool_result(e, &request.action),
        }
    }
}
