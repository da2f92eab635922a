use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{PipelineError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_logger(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let mut directives = config.filter_directives();
    if verbose {
        directives.push_str(",line_etl=debug");
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(config.with_target)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Compact => registry.with(fmt_layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(fmt_layer.pretty()).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
    };

    installed.map_err(|e| PipelineError::ConfigError {
        message: format!("logging already initialised: {}", e),
    })
}
