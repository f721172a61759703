//! grocerylist CLI Library
//!
//! This library provides the core functionality for the grocerylist CLI,
//! including command-line interface definitions, the grocery command
//! handlers, logging setup, and exit codes.

/// Command-line interface definitions and argument parsing
pub mod cli;
/// Shell completion generation
pub mod completions;
/// CLI error type and exit code mapping
pub mod error;
/// Exit codes used by the CLI application
pub mod exit_codes;
/// Handlers for the `grocery` command group
pub mod grocery;
/// Log output setup for console and stdio server modes
pub mod logging;
