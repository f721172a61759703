//! MCP tool implementations, one directory per tool

pub mod grocery_list;
