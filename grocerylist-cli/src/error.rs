//! Error handling for the grocerylist CLI
//!
//! Errors keep their source chain while carrying the exit code the process
//! should end with.

use crate::exit_codes::EXIT_ERROR;
use grocerylist::GroceryError;
use std::error::Error;
use std::fmt;

/// CLI-specific result type that preserves error information
pub type CliResult<T> = Result<T, CliError>;

/// CLI error type that includes both error information and suggested exit code
#[derive(Debug)]
pub struct CliError {
    /// Message printed after `Error: `
    pub message: String,
    /// Process exit code
    pub exit_code: i32,
    /// Underlying error, if any
    pub source: Option<Box<dyn Error + Send + Sync>>,
}

impl CliError {
    /// Create a new CLI error with a message and exit code
    pub fn new(message: impl Into<String>, exit_code: i32) -> Self {
        Self {
            message: message.into(),
            exit_code,
            source: None,
        }
    }

    /// Create a CLI error from another error with a specific exit code
    pub fn from_error<E: Error + Send + Sync + 'static>(error: E, exit_code: i32) -> Self {
        let message = error.to_string();
        Self {
            message,
            exit_code,
            source: Some(Box::new(error)),
        }
    }

    /// Create a CLI error with exit code 1 (general error)
    pub fn general<E: Error + Send + Sync + 'static>(error: E) -> Self {
        Self::from_error(error, EXIT_ERROR)
    }

    /// Get the full error chain as a formatted string
    pub fn full_chain(&self) -> String {
        let mut result = self.message.clone();

        let mut current_source = self.source.as_deref().and_then(|e| e.source());
        while let Some(err) = current_source {
            result.push_str(&format!("\n  Caused by: {err}"));
            current_source = err.source();
        }

        result
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

impl From<GroceryError> for CliError {
    fn from(error: GroceryError) -> Self {
        Self::general(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        Self::general(error)
    }
}

/// Convert a CliResult to an exit code, printing the error if needed
pub fn handle_cli_result<T>(result: CliResult<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => {
            tracing::debug!("Command failed: {}", e.full_chain());
            eprintln!("Error: {}", e.message);
            e.exit_code
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grocery_error_maps_to_exit_one() {
        let err: CliError = GroceryError::external_tool("dstask next", "boom").into();
        assert_eq!(err.exit_code, 1);
        assert_eq!(err.to_string(), "dstask command failed: boom");
    }

    #[test]
    fn test_full_chain_includes_causes() {
        let err: CliError = GroceryError::PartialClear {
            cleared: 1,
            total: 2,
            source: Box::new(GroceryError::external_tool("dstask remove 4", "locked")),
        }
        .into();

        let chain = err.full_chain();
        assert!(chain.starts_with("Cleared 1 of 2 bought item(s) before failure"));
        assert!(chain.contains("Caused by: dstask command failed: locked"));
    }

    #[test]
    fn test_handle_cli_result_exit_codes() {
        assert_eq!(handle_cli_result::<()>(Ok(())), 0);
        assert_eq!(handle_cli_result::<()>(Err(CliError::new("nope", 1))), 1);
    }
}
