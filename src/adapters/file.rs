use crate::domain::ports::{InputHandler, OutputHandler, RecordIter};
use crate::utils::error::{PipelineError, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

fn read_failed(path: &Path, e: std::io::Error) -> PipelineError {
    tracing::error!("Failed to read from file {}: {}", path.display(), e);
    PipelineError::io(path, e)
}

/// Splits a reader on `\n`, `\r\n` and bare `\r`, dropping the terminators.
struct UniversalLines<R> {
    reader: R,
}

impl<R: BufRead> UniversalLines<R> {
    fn new(reader: R) -> Self {
        Self { reader }
    }

    fn skip_newline_after_cr(&mut self) -> io::Result<()> {
        if self.reader.fill_buf()?.first() == Some(&b'\n') {
            self.reader.consume(1);
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for UniversalLines<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = Vec::new();
        loop {
            let buf = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Some(Err(e)),
            };
            if buf.is_empty() {
                if line.is_empty() {
                    return None;
                }
                break;
            }

            match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    line.extend_from_slice(&buf[..end]);
                    let terminator = buf[end];
                    self.reader.consume(end + 1);
                    if terminator == b'\r' {
                        if let Err(e) = self.skip_newline_after_cr() {
                            return Some(Err(e));
                        }
                    }
                    break;
                }
                None => {
                    let len = buf.len();
                    line.extend_from_slice(buf);
                    self.reader.consume(len);
                }
            }
        }

        Some(String::from_utf8(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)))
    }
}

/// Reads a text file one trimmed line at a time.
#[derive(Debug, Clone)]
pub struct FileInputHandler {
    path: PathBuf,
}

impl FileInputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!("FileInputHandler initialized with file: {}", path.display());
        Self { path }
    }
}

impl InputHandler for FileInputHandler {
    type Record = String;
    type AllInput = String;

    fn iter_input(&mut self) -> Result<RecordIter<'_, String>> {
        let path = self.path.as_path();
        let file = File::open(path).map_err(|e| read_failed(path, e))?;
        tracing::debug!("Opening {} for line-by-line reading", path.display());

        let lines = UniversalLines::new(BufReader::new(file)).map(move |line| {
            line.map(|l| l.trim().to_string())
                .map_err(|e| read_failed(path, e))
        });
        Ok(Box::new(lines))
    }

    fn get_all_input(&mut self) -> Result<String> {
        tracing::debug!("Reading all content from {} at once", self.path.display());
        let content =
            std::fs::read_to_string(&self.path).map_err(|e| read_failed(&self.path, e))?;
        Ok(content.replace("\r\n", "\n").replace('\r', "\n"))
    }
}

/// Buffers lines and appends them to a text file on flush.
///
/// Each flush writes the buffered lines joined by `\n` with no trailing
/// newline, so consecutive flushes run together on the boundary line.
#[derive(Debug, Clone)]
pub struct FileOutputHandler {
    path: PathBuf,
    buffer: Vec<String>,
}

impl FileOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!("FileOutputHandler initialized for file: {}", path.display());
        Self {
            path,
            buffer: Vec::new(),
        }
    }

    fn append(&self, lines: &[String]) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(lines.join("\n").as_bytes())
    }
}

impl OutputHandler for FileOutputHandler {
    type Record = String;

    fn save_to_buffer(&mut self, record: String) {
        tracing::debug!("Buffered data for file output: {}", record);
        self.buffer.push(record);
    }

    fn write_output(&mut self) {
        let lines = std::mem::take(&mut self.buffer);
        match self.append(&lines) {
            Ok(()) => tracing::info!("Wrote {} lines to {}", lines.len(), self.path.display()),
            Err(e) => tracing::error!("Failed to write to file {}: {}", self.path.display(), e),
        }
    }

    fn buffered(&self) -> &[String] {
        &self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{NamedTempFile, TempDir};

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_iter_input_yields_trimmed_lines_in_order() {
        let file = create_temp_file("  first\nsecond  \n\tthird\t\n");
        let mut handler = FileInputHandler::new(file.path());

        let lines: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();

        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_iter_input_without_final_newline() {
        let file = create_temp_file("a\nb");
        let mut handler = FileInputHandler::new(file.path());

        let count = handler.iter_input().unwrap().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_iter_input_keeps_interior_blank_lines() {
        let file = create_temp_file("a\n\n   \nb\n");
        let mut handler = FileInputHandler::new(file.path());

        let lines: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["a", "", "", "b"]);
    }

    #[test]
    fn test_iter_input_splits_on_bare_carriage_returns() {
        let file = create_temp_file("a\rb\rc\r");
        let mut handler = FileInputHandler::new(file.path());

        let lines: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_iter_input_mixed_line_endings() {
        let file = create_temp_file("one\r\ntwo\rthree\n\r\nfive");
        let mut handler = FileInputHandler::new(file.path());

        let lines: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();
        assert_eq!(lines, vec!["one", "two", "three", "", "five"]);
    }

    #[test]
    fn test_iter_input_invalid_utf8_is_io_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"ok\n\xff\xfe\n").unwrap();
        let mut handler = FileInputHandler::new(file.path());

        let results: Vec<Result<String>> = handler.iter_input().unwrap().collect();
        assert_eq!(results[0].as_ref().unwrap(), "ok");
        assert!(matches!(results[1], Err(PipelineError::IoError { .. })));
    }

    #[test]
    fn test_iter_input_restarts_from_the_top() {
        let file = create_temp_file("x\ny\n");
        let mut handler = FileInputHandler::new(file.path());

        let first: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();
        let second: Vec<String> = handler.iter_input().unwrap().map(Result::unwrap).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_iter_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut handler = FileInputHandler::new(dir.path().join("missing.txt"));

        let err = handler.iter_input().err().unwrap();
        assert!(matches!(err, PipelineError::IoError { .. }));
    }

    #[test]
    fn test_get_all_input_returns_raw_content() {
        let file = create_temp_file("  keep  \nspacing\n");
        let mut handler = FileInputHandler::new(file.path());

        assert_eq!(handler.get_all_input().unwrap(), "  keep  \nspacing\n");
    }

    #[test]
    fn test_get_all_input_normalizes_line_endings() {
        let file = create_temp_file("x\r\ny\r\nz\rw");
        let mut handler = FileInputHandler::new(file.path());

        assert_eq!(handler.get_all_input().unwrap(), "x\ny\nz\nw");
    }

    #[test]
    fn test_get_all_input_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut handler = FileInputHandler::new(dir.path().join("missing.txt"));

        assert!(handler.get_all_input().is_err());
    }

    #[test]
    fn test_write_output_appends_joined_lines() {
        let file = create_temp_file("existing\n");
        let mut handler = FileOutputHandler::new(file.path());

        handler.save_to_buffer("a".to_string());
        handler.save_to_buffer("b".to_string());
        assert_eq!(handler.buffered().len(), 2);
        handler.write_output();

        assert!(handler.buffered().is_empty());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "existing\na\nb");
    }

    #[test]
    fn test_write_output_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let mut handler = FileOutputHandler::new(&path);

        handler.save_to_buffer("only".to_string());
        handler.write_output();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "only");
    }

    #[test]
    fn test_consecutive_flushes_share_a_boundary_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let mut handler = FileOutputHandler::new(&path);

        handler.save_to_buffer("a".to_string());
        handler.save_to_buffer("b".to_string());
        handler.write_output();
        handler.save_to_buffer("c".to_string());
        handler.write_output();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nbc");
    }

    #[test]
    fn test_write_failure_still_clears_buffer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("out.txt");
        let mut handler = FileOutputHandler::new(&path);

        handler.save_to_buffer("lost".to_string());
        handler.write_output();

        assert!(handler.buffered().is_empty());
        assert!(!path.exists());
    }
}
