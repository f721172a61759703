//! Adapter for the dstask command-line task tracker
//!
//! This module builds argument vectors for dstask, decides how the binary is
//! started, runs it as a blocking subprocess and parses what it prints.

pub mod command;
pub mod item;
pub mod launcher;
pub mod parser;
pub mod runner;

pub use command::{DstaskCommand, DstaskVerb};
pub use item::{GroceryItem, ItemId};
pub use launcher::{Invocation, ToolLauncher};
pub use parser::{parse_output, OutputFormat};
pub use runner::{CommandRunner, ProcessRunner};
