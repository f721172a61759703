//! Resolution of how dstask is started
//!
//! dstask is either run directly or through the mise version manager, which
//! fetches and runs a pinned build. Probing for mise is done once, when the
//! launcher is resolved, and the result travels with the adapter.

use super::command::DstaskCommand;
use crate::config::Config;
use std::fmt;
use std::path::PathBuf;

/// How the external tool is started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLauncher {
    /// Run the tool by name or path
    Direct {
        /// Tool name or path
        program: String,
    },
    /// Run the tool through a version manager
    VersionManager {
        /// Resolved path of the version manager binary
        manager: PathBuf,
        /// Package spec the manager should run
        package: String,
        /// Tool name inside the package
        program: String,
        /// Directory prepended to the child's PATH, if it exists
        shims: Option<PathBuf>,
    },
}

impl ToolLauncher {
    /// Probe for the version manager and pick a launcher
    pub fn resolve(config: &Config) -> Self {
        if !config.use_version_manager {
            tracing::debug!("Version manager disabled, running {} directly", config.tool);
            return Self::direct(config);
        }

        match which::which(&config.version_manager) {
            Ok(manager) => {
                tracing::debug!(
                    "Running {} through version manager at {}",
                    config.tool,
                    manager.display()
                );
                Self::VersionManager {
                    manager,
                    package: config.version_manager_package.clone(),
                    program: config.tool.clone(),
                    shims: config
                        .version_manager_shims
                        .clone()
                        .filter(|dir| dir.is_dir()),
                }
            }
            Err(e) => {
                tracing::debug!(
                    "Version manager '{}' not available ({}), running {} directly",
                    config.version_manager,
                    e,
                    config.tool
                );
                Self::direct(config)
            }
        }
    }

    /// A launcher that runs the configured tool directly
    pub fn direct(config: &Config) -> Self {
        Self::Direct {
            program: config.tool.clone(),
        }
    }

    /// Build the full invocation for a dstask command
    pub fn invocation(&self, command: &DstaskCommand) -> Invocation {
        match self {
            Self::Direct { program } => Invocation {
                program: PathBuf::from(program),
                args: command.argv(),
                path_prefix: None,
            },
            Self::VersionManager {
                manager,
                package,
                program,
                shims,
            } => {
                let mut args = vec![
                    "exec".to_string(),
                    package.clone(),
                    "--".to_string(),
                    program.clone(),
                ];
                args.extend(command.argv());
                Invocation {
                    program: manager.clone(),
                    args,
                    path_prefix: shims.clone(),
                }
            }
        }
    }
}

/// A fully composed subprocess call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Binary to execute
    pub program: PathBuf,
    /// Argument vector, passed without shell interpretation
    pub args: Vec<String>,
    /// Directory to prepend to PATH for the child
    pub path_prefix: Option<PathBuf>,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {arg:?}")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
