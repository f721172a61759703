//! Subprocess execution for dstask invocations

use super::launcher::Invocation;
use crate::{GroceryError, Result};
use std::ffi::OsString;
use std::process::{Command, Stdio};

/// Executes a composed invocation and returns its standard output
///
/// Implementations return stdout with trailing whitespace removed, and an
/// [`GroceryError::ExternalTool`] when the process cannot be started or
/// exits with a failure status.
pub trait CommandRunner: Send + Sync {
    /// Run the invocation to completion
    fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs invocations as blocking child processes
#[derive(Debug, Default, Clone)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Create a new process runner
    pub fn new() -> Self {
        Self
    }

    fn search_path(prefix: &std::path::Path) -> Option<OsString> {
        let mut paths = vec![prefix.to_path_buf()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        match std::env::join_paths(paths) {
            Ok(joined) => Some(joined),
            Err(e) => {
                tracing::warn!("Cannot add {} to PATH: {}", prefix.display(), e);
                None
            }
        }
    }
}

impl CommandRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<String> {
        tracing::debug!("Running {}", invocation);

        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(path) = invocation
            .path_prefix
            .as_deref()
            .and_then(Self::search_path)
        {
            command.env("PATH", path);
        }

        let output = command.output().map_err(|e| {
            GroceryError::external_tool(
                invocation.to_string(),
                format!("failed to start {}: {e}", invocation.program.display()),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = if !stderr.trim().is_empty() {
                stderr.trim().to_string()
            } else if !stdout.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                format!("{} exited with {}", invocation.program.display(), output.status)
            };
            tracing::debug!("{} failed: {}", invocation, message);
            return Err(GroceryError::external_tool(invocation.to_string(), message));
        }

        Ok(stdout.trim_end().to_string())
    }
}
