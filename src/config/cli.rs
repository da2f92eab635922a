use super::DEFAULT_LOG_CONFIG_PATH;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFormat {
    /// One record per line
    Text,
    /// Comma-separated rows with a header
    Csv,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "line-etl")]
#[command(about = "Copy records from an input file to an output file")]
pub struct CliConfig {
    /// File to read records from
    pub input_file: String,

    /// File to append records to
    pub output_file: String,

    #[arg(long, value_enum, default_value_t = RecordFormat::Text)]
    pub format: RecordFormat,

    #[arg(long, default_value = DEFAULT_LOG_CONFIG_PATH)]
    pub log_config: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input_file", &self.input_file)?;
        validation::validate_path("output_file", &self.output_file)?;
        validation::validate_path("log_config", &self.log_config)
    }
}
