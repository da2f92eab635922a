pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    ConsoleInputHandler, ConsoleOutputHandler, CsvInputHandler, CsvOutputHandler,
    FileInputHandler, FileOutputHandler,
};
pub use config::LoggingConfig;
pub use core::pipeline::Pipeline;
pub use domain::model::Row;
pub use domain::ports::{InputHandler, OutputHandler};
pub use utils::error::{PipelineError, Result};
