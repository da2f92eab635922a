#[cfg(feature = "cli")]
pub mod cli;
pub mod logging;

pub use logging::{LogFormat, LoggingConfig, DEFAULT_LOG_CONFIG_PATH};

#[cfg(feature = "cli")]
pub use cli::{CliConfig, RecordFormat};
