//! Exit code constants for CLI commands
//!
//! These constants define the standard exit codes used throughout the application:
//! - 0: Success
//! - 1: A grocery operation failed
//! - 2: A server could not be started

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// A grocery operation failed
pub const EXIT_ERROR: i32 = 1;

/// The MCP server or gateway could not be started
pub const EXIT_SERVER_ERROR: i32 = 2;
