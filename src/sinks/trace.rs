use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::args::DumpDelimiter;
use crate::error::{AppError, AppResult, SinkError};
use crate::metrics::RequestResult;

pub const TRACE_HEADER: [&str; 6] = ["id", "tid", "duration", "size", "status_code", "error"];

/// One trace line. `duration_us` is the elapsed time in whole microseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRow {
    pub id: u64,
    pub tid: usize,
    pub duration_us: u64,
    pub size: u64,
    pub status_code: u16,
    pub error: String,
}

impl From<&RequestResult> for TraceRow {
    fn from(result: &RequestResult) -> Self {
        Self {
            id: result.sequence_id,
            tid: result.worker_id,
            duration_us: u64::try_from(result.elapsed.as_micros()).unwrap_or(u64::MAX),
            size: result.byte_size,
            status_code: result.status_code,
            error: result.error.clone().unwrap_or_default(),
        }
    }
}

/// Destination for trace rows. Written from the aggregator only, so
/// implementations may block.
pub trait TraceSink: Send {
    /// # Errors
    ///
    /// Returns an error when the header cannot be written.
    fn write_header(&mut self) -> AppResult<()>;

    /// # Errors
    ///
    /// Returns an error when the row cannot be written.
    fn write_row(&mut self, row: &TraceRow) -> AppResult<()>;

    /// Flushes buffered rows.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying writer fails to flush.
    fn finish(&mut self) -> AppResult<()>;
}

/// Delimited-text trace sink over any writer.
pub struct CsvTraceSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvTraceSink<W> {
    pub fn new(inner: W, delimiter: DumpDelimiter) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter.as_byte())
            .has_headers(false)
            .from_writer(inner);
        Self { writer }
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error when the final flush fails.
    pub fn into_inner(self) -> AppResult<W> {
        self.writer
            .into_inner()
            .map_err(|err| AppError::sink(SinkError::Flush { source: err.into_error() }))
    }
}

impl<W: Write + Send> TraceSink for CsvTraceSink<W> {
    fn write_header(&mut self) -> AppResult<()> {
        self.writer
            .write_record(TRACE_HEADER)
            .map_err(|source| AppError::sink(SinkError::WriteRow { source }))
    }

    fn write_row(&mut self, row: &TraceRow) -> AppResult<()> {
        self.writer
            .write_record([
                row.id.to_string(),
                row.tid.to_string(),
                row.duration_us.to_string(),
                row.size.to_string(),
                row.status_code.to_string(),
                row.error.clone(),
            ])
            .map_err(|source| AppError::sink(SinkError::WriteRow { source }))
    }

    fn finish(&mut self) -> AppResult<()> {
        self.writer
            .flush()
            .map_err(|source| AppError::sink(SinkError::Flush { source }))
    }
}

/// Creates (or truncates) the dump file and wraps it in a trace sink.
///
/// # Errors
///
/// Returns an error when the file cannot be created.
pub fn open_trace_sink(
    path: &Path,
    delimiter: DumpDelimiter,
) -> AppResult<Box<dyn TraceSink>> {
    let file = File::create(path).map_err(|source| {
        AppError::sink(SinkError::Open {
            path: path.to_path_buf(),
            source,
        })
    })?;
    Ok(Box::new(CsvTraceSink::new(BufWriter::new(file), delimiter)))
}
