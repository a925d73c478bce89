//! Per-request trace output.
mod trace;


pub use trace::{CsvTraceSink, TRACE_HEADER, TraceRow, TraceSink, open_trace_sink};
