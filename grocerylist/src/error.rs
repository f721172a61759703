//! Error handling for the grocery list library
//!
//! Every operation that shells out to the external task tool reports failures
//! through [`GroceryError`]. Caller adapters convert these into their own
//! channel's failure representation.

use crate::config::ConfigError;
use thiserror::Error;

/// The main error type for the grocery list library
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroceryError {
    /// The external tool could not be started or exited with a failure
    #[error("dstask command failed: {message}")]
    ExternalTool {
        /// The command line that was run, for diagnostics
        command: String,
        /// Diagnostic text produced by the tool (stderr where available)
        message: String,
    },

    /// A caller omitted or emptied a required field
    #[error("{message}")]
    Validation {
        /// Human readable description of the missing input
        message: String,
    },

    /// A caller asked for an action outside the recognized set
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A clear stopped partway through after removing some items
    #[error("Cleared {cleared} of {total} bought item(s) before failure: {source}")]
    PartialClear {
        /// Number of items removed before the failure
        cleared: usize,
        /// Number of resolved items the clear started with
        total: usize,
        /// The removal failure that stopped the clear
        #[source]
        source: Box<GroceryError>,
    },

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// IO error while serving a protocol stream
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A blocking operation panicked or was cancelled on the worker pool
    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl GroceryError {
    /// Create an external tool failure for the given command line
    pub fn external_tool(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a validation failure
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a validation failure for an action that needs a field
    pub fn missing_field(field: &str, action: &str) -> Self {
        let label = match field {
            "item" => "Item description",
            "id" => "Item ID",
            other => other,
        };
        Self::validation(format!("{label} is required for '{action}' action"))
    }

    /// True when the failure originated from the external tool, including a
    /// partial clear whose underlying cause was a tool failure.
    pub fn is_external_tool(&self) -> bool {
        match self {
            Self::ExternalTool { .. } => true,
            Self::PartialClear { source, .. } => source.is_external_tool(),
            _ => false,
        }
    }

    /// True when the failure was caused by caller input rather than the tool
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::UnknownAction(_))
    }
}

/// Result type alias for grocery list operations
pub type Result<T> = std::result::Result<T, GroceryError>;
