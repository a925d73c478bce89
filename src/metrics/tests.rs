use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::error::{AppError, AppResult};
use crate::sinks::{TraceRow, TraceSink};

fn run_async_test<F>(future: F) -> AppResult<()>
where
    F: Future<Output = AppResult<()>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(format!("Failed to build runtime: {}", err)))?;
    runtime.block_on(future)
}

#[derive(Clone, Default)]
struct MemorySink {
    rows: Arc<Mutex<Vec<TraceRow>>>,
    headers: Arc<Mutex<u32>>,
}

impl TraceSink for MemorySink {
    fn write_header(&mut self) -> AppResult<()> {
        let mut headers = self
            .headers
            .lock()
            .map_err(|err| AppError::validation(format!("header lock poisoned: {}", err)))?;
        *headers = headers.saturating_add(1);
        Ok(())
    }

    fn write_row(&mut self, row: &TraceRow) -> AppResult<()> {
        self.rows
            .lock()
            .map_err(|err| AppError::validation(format!("row lock poisoned: {}", err)))?
            .push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> AppResult<()> {
        Ok(())
    }
}

#[test]
fn fixed_latency_gives_equal_min_max_average() -> AppResult<()> {
    let latency = Duration::from_millis(12);
    let mut stats = StatsAccumulator::default();
    for id in 0..10 {
        stats.record(&RequestResult::completed(id, 0, latency, 200, 100));
    }
    let result = stats.finish(1, Duration::from_secs(1));

    if result.min_duration != latency
        || result.max_duration != latency
        || result.average_duration != latency
    {
        return Err(AppError::validation(format!("Unexpected stats: {:?}", result)));
    }
    if result.total_duration != latency.saturating_mul(10) {
        return Err(AppError::validation("Unexpected total duration"));
    }
    Ok(())
}

#[test]
fn average_size_truncates() -> AppResult<()> {
    let mut stats = StatsAccumulator::default();
    for (id, size) in [(0, 10), (1, 10), (2, 11)] {
        stats.record(&RequestResult::completed(id, 0, Duration::from_millis(1), 200, size));
    }
    let result = stats.finish(1, Duration::ZERO);
    if result.total_bytes != 31 || result.average_size != 10 {
        return Err(AppError::validation(format!("Unexpected sizes: {:?}", result)));
    }
    Ok(())
}

#[test]
fn average_duration_truncates_nanoseconds() -> AppResult<()> {
    let mut stats = StatsAccumulator::default();
    stats.record(&RequestResult::completed(0, 0, Duration::from_nanos(1), 200, 0));
    stats.record(&RequestResult::completed(1, 0, Duration::from_nanos(2), 200, 0));
    let result = stats.finish(1, Duration::ZERO);
    if result.average_duration != Duration::from_nanos(1) {
        return Err(AppError::validation(format!(
            "Unexpected average: {:?}",
            result.average_duration
        )));
    }
    Ok(())
}

#[test]
fn no_successes_yields_zeroes() -> AppResult<()> {
    let mut stats = StatsAccumulator::default();
    for id in 0..4 {
        stats.record(&RequestResult::failed(
            id,
            0,
            Duration::from_millis(5),
            "connection refused".to_owned(),
        ));
    }
    let result = stats.finish(2, Duration::ZERO);
    if result.completed_count != 0 || result.error_count != 4 {
        return Err(AppError::validation(format!("Unexpected counts: {:?}", result)));
    }
    if result.min_duration != Duration::ZERO
        || result.max_duration != Duration::ZERO
        || result.average_duration != Duration::ZERO
        || result.average_size != 0
        || result.total_bytes != 0
    {
        return Err(AppError::validation(format!("Expected zeroed stats: {:?}", result)));
    }
    Ok(())
}

#[test]
fn failures_do_not_move_min_max() -> AppResult<()> {
    let mut stats = StatsAccumulator::default();
    stats.record(&RequestResult::completed(0, 0, Duration::from_millis(5), 200, 1));
    stats.record(&RequestResult::failed(1, 0, Duration::from_millis(1), "x".to_owned()));
    stats.record(&RequestResult::failed(2, 0, Duration::from_millis(50), "y".to_owned()));
    stats.record(&RequestResult::completed(3, 0, Duration::from_millis(9), 503, 1));
    let result = stats.finish(1, Duration::ZERO);
    if result.min_duration != Duration::from_millis(5)
        || result.max_duration != Duration::from_millis(9)
    {
        return Err(AppError::validation(format!("Unexpected range: {:?}", result)));
    }
    if result.completed_count != 2 || result.error_count != 2 {
        return Err(AppError::validation("5xx must count as completed"));
    }
    Ok(())
}

#[test]
fn aggregator_drains_until_senders_drop() -> AppResult<()> {
    run_async_test(async {
        let (results_tx, results_rx) = mpsc::channel(2);
        let sink = MemorySink::default();
        let handle = spawn_aggregator(results_rx, Some(Box::new(sink.clone())), 2);

        let producer = tokio::spawn(async move {
            for id in 0..6_u64 {
                let result = if id == 4 {
                    RequestResult::failed(id, 1, Duration::from_millis(1), "reset".to_owned())
                } else {
                    RequestResult::completed(id, 0, Duration::from_millis(3), 200, 8)
                };
                if results_tx.send(result).await.is_err() {
                    return Err(AppError::validation("aggregator stopped early"));
                }
            }
            Ok(())
        });
        producer.await??;

        let statistics = handle.await??;
        if statistics.concurrency != 2 || statistics.observed() != 6 {
            return Err(AppError::validation(format!("Unexpected stats: {:?}", statistics)));
        }
        if statistics.error_count != 1 || statistics.average_size != 8 {
            return Err(AppError::validation(format!("Unexpected stats: {:?}", statistics)));
        }

        let headers = *sink
            .headers
            .lock()
            .map_err(|err| AppError::validation(format!("header lock poisoned: {}", err)))?;
        let rows = sink
            .rows
            .lock()
            .map_err(|err| AppError::validation(format!("row lock poisoned: {}", err)))?
            .clone();
        if headers != 1 || rows.len() != 6 {
            return Err(AppError::validation(format!(
                "Expected 1 header and 6 rows, got {} and {}",
                headers,
                rows.len()
            )));
        }
        let ids: Vec<u64> = rows.iter().map(|row| row.id).collect();
        if ids != vec![0, 1, 2, 3, 4, 5] {
            return Err(AppError::validation(format!("Rows out of order: {:?}", ids)));
        }
        Ok(())
    })
}

#[test]
fn aggregator_without_sink_reports_empty_run() -> AppResult<()> {
    run_async_test(async {
        let (results_tx, results_rx) = mpsc::channel::<RequestResult>(1);
        drop(results_tx);
        let statistics = spawn_aggregator(results_rx, None, 1).await??;
        if statistics.observed() != 0 || statistics.min_duration != Duration::ZERO {
            return Err(AppError::validation(format!("Unexpected stats: {:?}", statistics)));
        }
        Ok(())
    })
}
