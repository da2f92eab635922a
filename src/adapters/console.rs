use crate::domain::ports::{InputHandler, OutputHandler, RecordIter};
use crate::utils::error::{PipelineError, Result};
use std::fmt::Display;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

fn console_failed(e: io::Error) -> PipelineError {
    tracing::error!("Error reading console input: {}", e);
    PipelineError::ConsoleError(e)
}

/// Reads lines interactively until the user enters an empty line.
///
/// The welcome message is written as a prompt before every read. Hitting
/// end of stream before the empty line is an error.
pub struct ConsoleInputHandler<R = StdinLock<'static>, W = Stdout> {
    reader: R,
    prompt_out: W,
    welcome_msg: String,
}

impl ConsoleInputHandler {
    pub fn new(welcome_msg: impl Into<String>) -> Self {
        Self::with_io(io::stdin().lock(), io::stdout(), welcome_msg)
    }
}

impl<R: BufRead, W: Write> ConsoleInputHandler<R, W> {
    pub fn with_io(reader: R, prompt_out: W, welcome_msg: impl Into<String>) -> Self {
        tracing::debug!("ConsoleInputHandler initialized with custom welcome message");
        Self {
            reader,
            prompt_out,
            welcome_msg: welcome_msg.into(),
        }
    }

    /// `None` on an empty line.
    fn read_line(&mut self) -> Result<Option<String>> {
        self.prompt_out
            .write_all(self.welcome_msg.as_bytes())
            .and_then(|_| self.prompt_out.flush())
            .map_err(console_failed)?;

        let mut line = String::new();
        if self.reader.read_line(&mut line).map_err(console_failed)? == 0 {
            return Err(console_failed(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input ended before an empty line",
            )));
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line).filter(|l| !l.is_empty()))
    }
}

impl<R: BufRead, W: Write> InputHandler for ConsoleInputHandler<R, W> {
    type Record = String;
    type AllInput = Vec<String>;

    fn iter_input(&mut self) -> Result<RecordIter<'_, String>> {
        tracing::debug!("Starting to read console input iteratively");
        let mut failed = false;
        Ok(Box::new(std::iter::from_fn(move || {
            if failed {
                return None;
            }
            let next = self.read_line().transpose();
            failed = matches!(next, Some(Err(_)));
            next
        })
        .fuse()))
    }

    fn get_all_input(&mut self) -> Result<Vec<String>> {
        tracing::debug!("Reading console input until blank line");
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            lines.push(line);
        }
        Ok(lines)
    }
}

/// Buffers displayable records and prints one per line on flush.
pub struct ConsoleOutputHandler<T = String, W = Stdout> {
    writer: W,
    buffer: Vec<T>,
}

impl<T: Display> ConsoleOutputHandler<T> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<T: Display> Default for ConsoleOutputHandler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display, W: Write> ConsoleOutputHandler<T, W> {
    pub fn with_writer(writer: W) -> Self {
        tracing::debug!("ConsoleOutputHandler initialized");
        Self {
            writer,
            buffer: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn print_all(&mut self, items: &[T]) -> io::Result<()> {
        for item in items {
            writeln!(self.writer, "{}", item)?;
        }
        self.writer.flush()
    }
}

impl<T: Display, W: Write> OutputHandler for ConsoleOutputHandler<T, W> {
    type Record = T;

    fn save_to_buffer(&mut self, record: T) {
        tracing::debug!("Buffered data for console output: {}", record);
        self.buffer.push(record);
    }

    fn write_output(&mut self) {
        let items = std::mem::take(&mut self.buffer);
        if let Err(e) = self.print_all(&items) {
            tracing::error!("Failed to print to console: {}", e);
        }
    }

    fn buffered(&self) -> &[T] {
        &self.buffer
    }
}
