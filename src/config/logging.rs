use crate::utils::error::{PipelineError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing_subscriber::filter::Directive;

pub const DEFAULT_LOG_CONFIG_PATH: &str = "configs/logging.toml";

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Process-wide logging setup, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    pub with_target: bool,
    /// Extra `EnvFilter` directives such as `line_etl::adapters=trace`.
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_target: false,
            directives: Vec::new(),
        }
    }
}

impl LoggingConfig {
    /// Loads the TOML file at `path`, falling back to defaults when it does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PipelineError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Filter string handed to `EnvFilter` when `RUST_LOG` is unset.
    pub fn filter_directives(&self) -> String {
        std::iter::once(self.level.to_ascii_lowercase())
            .chain(self.directives.iter().cloned())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_one_of("logging.level", &self.level, &LEVELS)?;
        for directive in &self.directives {
            validation::validate_non_empty_string("logging.directives", directive)?;
            directive.parse::<Directive>().map_err(|e| {
                PipelineError::InvalidConfigValueError {
                    field: "logging.directives".to_string(),
                    value: directive.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}
