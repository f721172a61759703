//! Model Context Protocol server support
//!
//! Exposes the grocery list to AI assistants as the `grocery_list` tool.

pub mod server;
pub mod shared_utils;
pub mod tool_registry;
pub mod tools;

pub use server::McpServer;
pub use shared_utils::McpErrorHandler;
pub use tool_registry::{register_grocery_tools, BaseToolImpl, McpTool, ToolContext, ToolRegistry};
pub use tools::grocery_list::{GroceryListRequest, GroceryListTool};
