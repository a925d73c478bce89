use std::time::{Duration, Instant};

use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

use crate::error::AppResult;
use crate::sinks::{TraceRow, TraceSink};

use super::{RequestResult, RunStatistics};

/// Running totals over a stream of results; O(1) memory regardless of run size.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    completed: u64,
    errors: u64,
    total_bytes: u64,
    total_duration: Duration,
    min_duration: Option<Duration>,
    max_duration: Duration,
}

impl StatsAccumulator {
    pub fn record(&mut self, result: &RequestResult) {
        if result.is_error() {
            self.errors = self.errors.saturating_add(1);
            return;
        }

        self.completed = self.completed.saturating_add(1);
        self.total_bytes = self.total_bytes.saturating_add(result.byte_size);
        self.total_duration = self.total_duration.saturating_add(result.elapsed);
        self.min_duration = Some(
            self.min_duration
                .map_or(result.elapsed, |current| current.min(result.elapsed)),
        );
        self.max_duration = self.max_duration.max(result.elapsed);
    }

    #[must_use]
    pub fn finish(self, concurrency: usize, wall_clock_total: Duration) -> RunStatistics {
        let average_duration = if self.completed > 0 {
            let nanos = self
                .total_duration
                .as_nanos()
                .checked_div(u128::from(self.completed))
                .unwrap_or(0);
            Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
        } else {
            Duration::ZERO
        };
        let average_size = self.total_bytes.checked_div(self.completed).unwrap_or(0);

        RunStatistics {
            concurrency,
            completed_count: self.completed,
            error_count: self.errors,
            total_bytes: self.total_bytes,
            total_duration: self.total_duration,
            min_duration: self.min_duration.unwrap_or(Duration::ZERO),
            max_duration: self.max_duration,
            average_duration,
            average_size,
            wall_clock_total,
        }
    }
}

/// Starts the aggregator. It drains `results_rx` until every sender is gone,
/// writing one trace row per result in arrival order, and resolves with the
/// finished statistics.
///
/// Runs on the blocking pool because trace sinks write synchronously.
#[must_use]
pub(crate) fn spawn_aggregator(
    mut results_rx: mpsc::Receiver<RequestResult>,
    mut trace_sink: Option<Box<dyn TraceSink>>,
    concurrency: usize,
) -> JoinHandle<AppResult<RunStatistics>> {
    tokio::task::spawn_blocking(move || {
        let start = Instant::now();
        let mut stats = StatsAccumulator::default();

        if let Some(sink) = trace_sink.as_mut() {
            sink.write_header()?;
        }

        while let Some(result) = results_rx.blocking_recv() {
            stats.record(&result);
            if let Some(sink) = trace_sink.as_mut() {
                sink.write_row(&TraceRow::from(&result))?;
            }
        }

        if let Some(sink) = trace_sink.as_mut() {
            sink.finish()?;
        }

        let statistics = stats.finish(concurrency, start.elapsed());
        debug!(
            "Aggregated {} results ({} errors)",
            statistics.observed(),
            statistics.error_count
        );
        Ok(statistics)
    })
}
