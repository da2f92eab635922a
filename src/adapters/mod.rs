// Adapters layer: concrete input and output handlers for files, the console and CSV.

pub mod console;
pub mod file;
pub mod tabular;

pub use console::{ConsoleInputHandler, ConsoleOutputHandler};
pub use file::{FileInputHandler, FileOutputHandler};
pub use tabular::{CsvInputHandler, CsvOutputHandler};
