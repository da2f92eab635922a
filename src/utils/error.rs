use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("IO error on {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV processing error on {}: {source}", .path.display())]
    CsvError {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV input {} has no header row", .path.display())]
    EmptyCsvError { path: PathBuf },

    #[error("Row contains field '{field}' not present in header {header:?}")]
    UnexpectedFieldError { field: String, header: Vec<String> },

    #[error("Console IO error: {0}")]
    ConsoleError(#[source] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Bad user input such as arguments, config values or malformed data.
    High,
    /// The environment failed us: files, terminals.
    Critical,
}

impl PipelineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }

    pub fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::CsvError {
            path: path.into(),
            source,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::EmptyCsvError { .. }
            | Self::CsvError { .. }
            | Self::UnexpectedFieldError { .. } => ErrorSeverity::High,
            Self::IoError { .. } | Self::ConsoleError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::IoError { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                format!("File not found: {}", path.display())
            }
            Self::IoError { path, .. } => format!("Could not access {}", path.display()),
            Self::CsvError { path, .. } => format!("Could not parse CSV file {}", path.display()),
            Self::EmptyCsvError { path } => format!("CSV file {} is empty", path.display()),
            Self::UnexpectedFieldError { field, .. } => {
                format!("Row has an unexpected column '{}'", field)
            }
            Self::ConsoleError(_) => "Could not read from the console".to_string(),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid {}: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError { .. } => "Check that the path exists and is readable",
            Self::CsvError { .. } => "Make sure every row has as many fields as the header",
            Self::EmptyCsvError { .. } => "Add a header row to the CSV file",
            Self::UnexpectedFieldError { .. } => "Give every row the same columns as the first one",
            Self::ConsoleError(_) => "Run the command from an interactive terminal",
            Self::ConfigError { .. } => "Fix or remove the logging configuration file",
            Self::InvalidConfigValueError { .. } => "Run with --help to see accepted values",
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
