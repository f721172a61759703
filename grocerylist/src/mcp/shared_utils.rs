//! Shared utilities for MCP operations

use super::tool_registry::BaseToolImpl;
use crate::GroceryError;
use rmcp::model::CallToolResult;
use rmcp::Error as McpError;

/// Common error handling patterns for MCP operations
pub struct McpErrorHandler;

impl McpErrorHandler {
    /// Convert a [`GroceryError`] to an MCP protocol error
    ///
    /// - caller input errors -> invalid_params
    /// - everything else -> internal_error
    pub fn handle_error(error: GroceryError, operation: &str) -> McpError {
        tracing::error!("MCP operation '{}' failed: {}", operation, error);

        if error.is_caller_error() {
            McpError::invalid_params(error.to_string(), None)
        } else {
            McpError::internal_error(error.to_string(), None)
        }
    }

    /// Turn an operation failure into a tool result
    ///
    /// Domain failures (bad input, a failing dstask) are reported to the
    /// model as an `is_error` text block so it can read and react to them.
    /// Anything else becomes a protocol error.
    pub fn tool_result(
        error: GroceryError,
        operation: &str,
    ) -> std::result::Result<CallToolResult, McpError> {
        if error.is_caller_error() || error.is_external_tool() {
            tracing::error!("MCP operation '{}' failed: {}", operation, error);
            Ok(BaseToolImpl::create_error_response(error.to_string(), None))
        } else {
            Err(Self::handle_error(error, operation))
        }
    }
}
