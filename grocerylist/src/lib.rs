//! # grocerylist
//!
//! A grocery shopping list kept in the [dstask](https://github.com/naggie/dstask)
//! task tracker.
//!
//! Every item is a dstask task carrying the `+grocery` tag. This crate shells
//! out to dstask, parses what it prints, and offers the result to three kinds
//! of caller.
//!
//! ## Features
//!
//! - **Grocery operations**: list, add, mark bought, remove, clear bought items
//! - **Output parsing**: tolerates both JSON and line-oriented dstask output
//! - **MCP Support**: a `grocery_list` tool for AI assistants
//! - **Gateway**: `grocery.list`, `grocery.add` and `grocery.done` as JSON-RPC methods
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use grocerylist::{Config, GroceryList};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let list = GroceryList::new(Config::load()?);
//!
//! println!("{}", list.add_item("oat milk")?);
//! for item in list.list_pending()? {
//!     println!("{}. {}", item.id, item.summary);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Shared helpers
pub mod common;

/// Configuration loading
pub mod config;

/// dstask command composition, execution and output parsing
pub mod dstask;

/// Error types used throughout the library
pub mod error;

/// Remote-method gateway over JSON-RPC
pub mod gateway;

/// Grocery list operations
pub mod grocery;

/// Model Context Protocol (MCP) server support
pub mod mcp;

pub use config::{Config, ConfigError, ParseMode};
pub use dstask::{GroceryItem, ItemId};
pub use error::{GroceryError, Result};
pub use grocery::{
    format_item_line, format_plain_list, GroceryAction, GroceryList, GroceryOutcome,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Config, GroceryAction, GroceryError, GroceryItem, GroceryList, GroceryOutcome, ItemId,
        Result,
    };

    pub use crate::gateway::{GatewayMethods, GatewayServer};
    pub use crate::mcp::McpServer;
}

/// Test utilities module for testing support
#[doc(hidden)]
pub mod test_utils;
