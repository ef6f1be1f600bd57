use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

use crate::join::UnknownJoinPolicy;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// How join output is written to the terminal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Error)]
#[error("Unknown output format `{0}`; expected `table` or `json`")]
pub struct ParseOutputFormatError(String);

impl FromStr for OutputFormat {
    type Err = ParseOutputFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ParseOutputFormatError(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// Visualizer configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Dataset YAML file; the bundled dataset is used when absent
    #[validate(length(min = 1, message = "Schema path cannot be empty"))]
    pub schema_path: Option<String>,

    pub output_format: OutputFormat,

    /// Rows printed per table before eliding the rest (1-10000)
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Max display rows must be between 1 and 10000"
    ))]
    pub max_display_rows: usize,

    /// What to do with an unrecognised join type
    pub unknown_join_policy: UnknownJoinPolicy,

    /// Also print both input tables
    pub show_source_tables: bool,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            schema_path: None,
            output_format: OutputFormat::Table,
            max_display_rows: 50,
            unknown_join_policy: UnknownJoinPolicy::Reject,
            show_source_tables: false,
        }
    }
}

impl VisualizerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            schema_path: env::var("JOINVIZ_SCHEMA").ok(),
            output_format: parse_env_var("JOINVIZ_FORMAT", "table")?,
            max_display_rows: parse_env_var("JOINVIZ_MAX_ROWS", "50")?,
            unknown_join_policy: parse_env_var("JOINVIZ_JOIN_FALLBACK", "reject")?,
            show_source_tables: parse_env_var("JOINVIZ_SHOW_SOURCES", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge(cli);

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Merge with CLI values (CLI overrides environment where given)
    pub fn merge(&mut self, cli: CliConfig) {
        if let Some(path) = cli.schema_path {
            self.schema_path = Some(path);
        }
        if let Some(format) = cli.output_format {
            self.output_format = format;
        }
        if let Some(rows) = cli.max_display_rows {
            self.max_display_rows = rows;
        }
        if let Some(policy) = cli.unknown_join_policy {
            self.unknown_join_policy = policy;
        }
        self.show_source_tables |= cli.show_source_tables;
    }
}

/// CLI configuration (parsed from command line arguments); `None` means
/// the flag was not given
#[derive(Clone, Debug, Default)]
pub struct CliConfig {
    pub schema_path: Option<String>,
    pub output_format: Option<OutputFormat>,
    pub max_display_rows: Option<usize>,
    pub unknown_join_policy: Option<UnknownJoinPolicy>,
    pub show_source_tables: bool,
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
