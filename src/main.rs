use anyhow::Context;
use clap::Parser;
use line_etl::config::RecordFormat;
use line_etl::utils::{logger, validation::Validate};
use line_etl::{
    CliConfig, CsvInputHandler, CsvOutputHandler, FileInputHandler, FileOutputHandler,
    LoggingConfig, Pipeline, PipelineError,
};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 日誌設定只在啟動時載入一次
    let logging = LoggingConfig::load_or_default(&config.log_config)
        .with_context(|| format!("failed to load logging config '{}'", config.log_config))?;
    logging
        .validate()
        .with_context(|| format!("invalid logging config '{}'", config.log_config))?;
    logger::init_logger(&logging, config.verbose).context("failed to initialise logging")?;

    tracing::info!("Starting line-etl");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let result = match config.format {
        RecordFormat::Text => Pipeline::new(
            FileInputHandler::new(&config.input_file),
            FileOutputHandler::new(&config.output_file),
        )
        .run(),
        RecordFormat::Csv => Pipeline::new(
            CsvInputHandler::new(&config.input_file),
            CsvOutputHandler::new(&config.output_file),
        )
        .run(),
    };

    match result {
        Ok(count) => {
            tracing::info!("✅ Copied {} records to {}", count, config.output_file);
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &PipelineError) -> ! {
    tracing::error!("❌ Pipeline failed: {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    std::process::exit(e.exit_code());
}
