//! Configuration management for the grocery list
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! `GROCERYLIST_*` environment variables.

use crate::common::env_loader::EnvLoader;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_TOOL: &str = "dstask";
const DEFAULT_MARKER_TAG: &str = "+grocery";
const DEFAULT_VERSION_MANAGER: &str = "mise";
const DEFAULT_VERSION_MANAGER_PACKAGE: &str = "go:github.com/naggie/dstask/cmd/dstask@latest";
const DEFAULT_PRIORITY: &str = "P2";

const ENV_PREFIX: &str = "GROCERYLIST";
const LOCAL_CONFIG_FILE: &str = ".grocerylist.yaml";

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        /// Path to the configuration file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML content from a configuration file
    #[error("Invalid YAML syntax in {path}:\n{source}\n\nHint: Check for proper indentation and YAML formatting")]
    YamlParse {
        /// Path to the configuration file with invalid YAML content
        path: PathBuf,
        /// Underlying YAML parsing error
        #[source]
        source: serde_yaml::Error,
    },

    /// Invalid configuration value for a specific field
    #[error("Invalid configuration value for '{field}': {value}\n{hint}")]
    InvalidValue {
        /// Name of the offending field
        field: String,
        /// The value that was provided
        value: String,
        /// How to fix it
        hint: String,
    },
}

/// How the external tool's standard output should be interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Pick structured or line mode by looking at the output
    #[default]
    Auto,
    /// Always look for a JSON array block
    #[serde(alias = "structured")]
    Json,
    /// Always parse `<id> <status> <description> +tags` lines
    #[serde(alias = "line")]
    Text,
}

impl FromStr for ParseMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "json" | "structured" => Ok(Self::Json),
            "text" | "line" => Ok(Self::Text),
            other => Err(ConfigError::InvalidValue {
                field: "output_format".to_string(),
                value: other.to_string(),
                hint: "output_format must be one of: auto, json, text".to_string(),
            }),
        }
    }
}

/// Configuration settings for the grocery list adapter
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Name or path of the external task tool (default: "dstask")
    pub tool: String,
    /// Tag scoping every query and mutation to the grocery list (default: "+grocery")
    pub marker_tag: String,
    /// Version manager used to run a pinned tool when available (default: "mise")
    pub version_manager: String,
    /// Whether to probe for the version manager at all (default: true)
    pub use_version_manager: bool,
    /// Package spec handed to the version manager (default: the dstask Go module)
    pub version_manager_package: String,
    /// Shims directory prepended to the child's PATH when it exists
    pub version_manager_shims: Option<PathBuf>,
    /// How to interpret the tool's output (default: auto)
    pub output_format: ParseMode,
    /// Priority the tool assigns by default; only other priorities are displayed
    pub default_priority: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            marker_tag: DEFAULT_MARKER_TAG.to_string(),
            version_manager: DEFAULT_VERSION_MANAGER.to_string(),
            use_version_manager: true,
            version_manager_package: DEFAULT_VERSION_MANAGER_PACKAGE.to_string(),
            version_manager_shims: default_shims_dir(),
            output_format: ParseMode::Auto,
            default_priority: DEFAULT_PRIORITY.to_string(),
        }
    }
}

/// `~/.local/share/mise/shims`, where mise keeps its shims
fn default_shims_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(".local")
            .join("share")
            .join("mise")
            .join("shims")
    })
}

impl Config {
    /// Create a configuration from defaults, the YAML file (if any) and the
    /// environment, in that order of precedence
    ///
    /// An unreadable or invalid YAML file is an error.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        YamlConfig::load_or_default()?.apply_to_config(&mut config);
        config.apply_env_vars();
        config.normalize();
        Ok(config)
    }

    /// Apply environment variable configuration to this config
    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        self.tool = loader.load_string("TOOL", &self.tool);
        self.marker_tag = loader.load_string("TAG", &self.marker_tag);
        self.version_manager = loader.load_string("VERSION_MANAGER", &self.version_manager);
        self.use_version_manager =
            loader.load_flag("USE_VERSION_MANAGER", self.use_version_manager);
        self.version_manager_package =
            loader.load_string("VERSION_MANAGER_PACKAGE", &self.version_manager_package);
        if let Some(shims) = loader.load_optional::<PathBuf>("VERSION_MANAGER_SHIMS") {
            self.version_manager_shims = Some(shims);
        }
        if let Ok(value) = std::env::var(format!("{ENV_PREFIX}_OUTPUT_FORMAT")) {
            match value.parse() {
                Ok(mode) => self.output_format = mode,
                Err(e) => tracing::warn!("Ignoring {}_OUTPUT_FORMAT: {}", ENV_PREFIX, e),
            }
        }
    }

    /// Marker tags are always passed to the tool with a leading `+`
    ///
    /// A blank tag would scope nothing, so it falls back to the default.
    fn normalize(&mut self) {
        let name = self.marker_tag.trim().trim_start_matches('+').trim();
        self.marker_tag = if name.is_empty() {
            tracing::warn!(
                "Ignoring blank marker tag {:?}, using {}",
                self.marker_tag,
                DEFAULT_MARKER_TAG
            );
            DEFAULT_MARKER_TAG.to_string()
        } else {
            format!("+{name}")
        };
    }

    /// Find the YAML configuration file
    ///
    /// The search order is:
    /// 1. Current working directory: `.grocerylist.yaml`
    /// 2. Home directory: `~/.grocerylist/config.yaml`
    pub fn find_yaml_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];

        if let Some(home_dir) = dirs::home_dir() {
            search_paths.push(home_dir.join(".grocerylist").join("config.yaml"));
        }

        let found = search_paths.into_iter().find(|path| path.is_file());
        match &found {
            Some(path) => tracing::debug!("Found configuration file: {:?}", path),
            None => tracing::debug!("No grocerylist configuration file found"),
        }
        found
    }
}

/// Configuration as it appears in the YAML file; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct YamlConfig {
    /// External task tool
    pub tool: Option<String>,
    /// Grocery marker tag
    pub marker_tag: Option<String>,
    /// Version manager binary
    pub version_manager: Option<String>,
    /// Whether to use the version manager
    pub use_version_manager: Option<bool>,
    /// Version manager package spec
    pub version_manager_package: Option<String>,
    /// Version manager shims directory
    pub version_manager_shims: Option<PathBuf>,
    /// Output parse mode
    pub output_format: Option<ParseMode>,
    /// Default priority hidden from listings
    pub default_priority: Option<String>,
}

impl YamlConfig {
    /// Apply YAML configuration values to an existing Config
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(ref tool) = self.tool {
            config.tool = tool.clone();
        }
        if let Some(ref marker_tag) = self.marker_tag {
            config.marker_tag = marker_tag.clone();
        }
        if let Some(ref version_manager) = self.version_manager {
            config.version_manager = version_manager.clone();
        }
        if let Some(use_version_manager) = self.use_version_manager {
            config.use_version_manager = use_version_manager;
        }
        if let Some(ref package) = self.version_manager_package {
            config.version_manager_package = package.clone();
        }
        if let Some(ref shims) = self.version_manager_shims {
            config.version_manager_shims = Some(shims.clone());
        }
        if let Some(output_format) = self.output_format {
            config.output_format = output_format;
        }
        if let Some(ref priority) = self.default_priority {
            config.default_priority = priority.clone();
        }
    }

    /// Load YAML configuration from a file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!("Loading YAML configuration from: {:?}", path);

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        // An empty file is a valid, empty configuration
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: YamlConfig =
            serde_yaml::from_str(&content).map_err(|e| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source: e,
            })?;

        config.validate_yaml_values()?;
        Ok(config)
    }

    /// Load the YAML configuration if a file exists, otherwise an empty one
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Config::find_yaml_config_file() {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn validate_yaml_values(&self) -> Result<(), ConfigError> {
        let non_empty = [
            ("tool", &self.tool),
            ("marker_tag", &self.marker_tag),
            ("version_manager", &self.version_manager),
        ];
        for (field, value) in non_empty {
            if let Some(value) = value {
                let blank = match field {
                    "marker_tag" => value.trim().trim_start_matches('+').trim().is_empty(),
                    _ => value.trim().is_empty(),
                };
                if blank {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        value: value.clone(),
                        hint: format!("{field} cannot be empty in YAML configuration"),
                    });
                }
            }
        }
        Ok(())
    }
}
