use crate::domain::model::{parse_cell, render_cell, Row};
use crate::domain::ports::{InputHandler, OutputHandler, RecordIter};
use crate::utils::error::{PipelineError, Result};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

fn parse_failed(path: &Path, e: csv::Error) -> PipelineError {
    tracing::error!("Error processing CSV file {}: {}", path.display(), e);
    if let csv::ErrorKind::Io(io) = e.kind() {
        return PipelineError::io(path, std::io::Error::new(io.kind(), io.to_string()));
    }
    PipelineError::csv(path, e)
}

/// Repeated column names get `.1`, `.2`, ... suffixes so no column is lost.
fn unique_field_names(headers: &csv::StringRecord) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    headers
        .iter()
        .map(|name| {
            let mut unique = name.to_string();
            let mut suffix = 1;
            while taken.contains(&unique) {
                unique = format!("{}.{}", name, suffix);
                suffix += 1;
            }
            taken.insert(unique.clone());
            unique
        })
        .collect()
}

fn to_row(field_names: &[String], record: &csv::StringRecord) -> Row {
    field_names
        .iter()
        .zip(record.iter())
        .map(|(name, cell)| (name.clone(), parse_cell(cell)))
        .collect()
}

/// Reads a CSV file with a header row into [`Row`]s.
#[derive(Debug, Clone)]
pub struct CsvInputHandler {
    path: PathBuf,
}

impl CsvInputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!("CsvInputHandler initialized with file: {}", path.display());
        Self { path }
    }
}

impl InputHandler for CsvInputHandler {
    type Record = Row;
    type AllInput = Vec<Row>;

    fn iter_input(&mut self) -> Result<RecordIter<'_, Row>> {
        let path = self.path.as_path();
        let mut reader = csv::Reader::from_path(path).map_err(|e| parse_failed(path, e))?;
        let headers = reader.headers().map_err(|e| parse_failed(path, e))?.clone();
        if headers.is_empty() {
            tracing::error!("CSV file {} has no header row", path.display());
            return Err(PipelineError::EmptyCsvError {
                path: path.to_path_buf(),
            });
        }
        let field_names = unique_field_names(&headers);
        tracing::debug!("CSV file {} opened with columns {:?}", path.display(), field_names);

        let rows = reader.into_records().map(move |record| {
            record
                .map(|r| to_row(&field_names, &r))
                .map_err(|e| parse_failed(path, e))
        });
        Ok(Box::new(rows))
    }

    fn get_all_input(&mut self) -> Result<Vec<Row>> {
        let rows = self.iter_input()?.collect::<Result<Vec<_>>>()?;
        tracing::debug!("Read {} rows from {}", rows.len(), self.path.display());
        Ok(rows)
    }
}

/// Buffers rows and appends them to a CSV file on flush.
///
/// The header comes from the first buffered row's keys and is written only
/// on this handler's first non-empty flush.
#[derive(Debug, Clone)]
pub struct CsvOutputHandler {
    path: PathBuf,
    buffer: Vec<Row>,
    header_written: bool,
}

impl CsvOutputHandler {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        tracing::debug!("CsvOutputHandler initialized for file: {}", path.display());
        Self {
            path,
            buffer: Vec::new(),
            header_written: false,
        }
    }

    fn append(&mut self, rows: &[Row]) -> Result<()> {
        let Some(first) = rows.first() else {
            return Ok(());
        };
        let path = &self.path;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| PipelineError::io(path, e))?;
        let mut writer = csv::Writer::from_writer(file);
        let fieldnames: Vec<String> = first.keys().cloned().collect();

        if !self.header_written {
            writer
                .write_record(&fieldnames)
                .map_err(|e| PipelineError::csv(path, e))?;
            self.header_written = true;
            tracing::debug!("Wrote header to CSV file {}", path.display());
        }

        // Rows already handed to the writer are flushed on drop even if a later row fails.
        for row in rows {
            if let Some(extra) = row.keys().find(|key| !fieldnames.contains(key)) {
                return Err(PipelineError::UnexpectedFieldError {
                    field: extra.clone(),
                    header: fieldnames,
                });
            }
            let cells = fieldnames
                .iter()
                .map(|name| row.get(name).map(render_cell).unwrap_or_default());
            writer
                .write_record(cells)
                .map_err(|e| PipelineError::csv(path, e))?;
        }

        writer.flush().map_err(|e| PipelineError::io(path, e))
    }
}

impl OutputHandler for CsvOutputHandler {
    type Record = Row;

    fn save_to_buffer(&mut self, record: Row) {
        tracing::debug!("Buffered data for CSV output: {:?}", record);
        self.buffer.push(record);
    }

    fn write_output(&mut self) {
        if self.buffer.is_empty() {
            tracing::debug!("No data to write for CSV output");
            return;
        }

        let rows = std::mem::take(&mut self.buffer);
        match self.append(&rows) {
            Ok(()) => tracing::info!("Wrote {} rows to {}", rows.len(), self.path.display()),
            Err(e) => {
                tracing::error!("Failed to write to CSV file {}: {}", self.path.display(), e)
            }
        }
    }

    fn buffered(&self) -> &[Row] {
        &self.buffer
    }
}
