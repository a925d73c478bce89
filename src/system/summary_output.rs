use std::fmt::Write as _;
use std::time::Duration;

use crate::args::OutputFormat;
use crate::error::{AppError, AppResult, OutputError};
use crate::metrics::RunStatistics;

fn summary_fields(stats: &RunStatistics) -> [(&'static str, String); 8] {
    [
        ("Concurrent", stats.concurrency.to_string()),
        ("Requests", stats.observed().to_string()),
        ("Errors", stats.error_count.to_string()),
        ("Total time", format!("{:?}", stats.wall_clock_total)),
        ("Min Duration", format!("{:?}", stats.min_duration)),
        ("Max Duration", format!("{:?}", stats.max_duration)),
        ("Average Duration", format!("{:?}", stats.average_duration)),
        ("Average Size", stats.average_size.to_string()),
    ]
}

fn render_failed(source: std::fmt::Error) -> AppError {
    AppError::output(OutputError::RenderSummary { source })
}

/// Renders the summary as aligned `key: value` lines.
///
/// # Errors
///
/// Returns an error if formatting into the output buffer fails.
pub(crate) fn render_text(stats: &RunStatistics) -> AppResult<String> {
    let fields = summary_fields(stats);
    let width = fields
        .iter()
        .map(|(key, _)| key.len().saturating_add(1))
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (key, value) in fields {
        writeln!(output, "{:<width$} {}", format!("{}:", key), value, width = width)
            .map_err(render_failed)?;
    }
    Ok(output)
}

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// Renders the summary as a JSON object with durations in microseconds.
///
/// # Errors
///
/// Returns an error if the summary cannot be serialized.
pub(crate) fn render_json(stats: &RunStatistics) -> AppResult<String> {
    let summary = serde_json::json!({
        "concurrent": stats.concurrency,
        "requests": stats.observed(),
        "completed": stats.completed_count,
        "errors": stats.error_count,
        "total_bytes": stats.total_bytes,
        "total_time_us": micros(stats.wall_clock_total),
        "min_duration_us": micros(stats.min_duration),
        "max_duration_us": micros(stats.max_duration),
        "average_duration_us": micros(stats.average_duration),
        "average_size": stats.average_size,
    });
    Ok(serde_json::to_string_pretty(&summary)?)
}

/// Prints the final summary to stdout in the selected format.
///
/// # Errors
///
/// Returns an error if the summary cannot be rendered.
pub(crate) fn print_summary(stats: &RunStatistics, format: OutputFormat) -> AppResult<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(stats)?,
        OutputFormat::Json => render_json(stats)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}
