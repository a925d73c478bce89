use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult, PipelineError};
use crate::http::spawn_worker_pool;
use crate::metrics::{RequestResult, RunStatistics, spawn_aggregator};
use crate::requests::{RequestDescriptor, RequestPlan, run_builder};
use crate::sinks::TraceSink;

/// Descriptors wait in the dispatch channel one at a time.
pub const DISPATCH_CAPACITY: usize = 1;

/// Runs every request of `plan` across `concurrency` workers and returns the
/// aggregated statistics.
///
/// The result channel closes only after the supervisor has joined all
/// workers, and the aggregator finishes only after the result channel closes,
/// so every dispatched request is reflected exactly once in the statistics.
///
/// An empty plan returns zeroed statistics without starting any task.
///
/// # Errors
///
/// Returns an error when the trace sink fails, a worker panics, or the number
/// of results does not match the number of dispatched requests.
pub async fn run_pipeline(
    plan: RequestPlan,
    client: Client,
    concurrency: usize,
    trace_sink: Option<Box<dyn TraceSink>>,
) -> AppResult<RunStatistics> {
    let worker_count = concurrency.max(1);
    if plan.is_empty() {
        warn!("No requests to send; skipping the run");
        if let Some(mut sink) = trace_sink {
            sink.write_header()?;
            sink.finish()?;
        }
        return Ok(RunStatistics {
            concurrency: worker_count,
            ..RunStatistics::default()
        });
    }
    info!(
        "Sending {} requests with {} workers",
        plan.len(),
        worker_count
    );

    let (dispatch_tx, dispatch_rx) = flume::bounded::<RequestDescriptor>(DISPATCH_CAPACITY);
    let (results_tx, results_rx) = mpsc::channel::<RequestResult>(worker_count);

    let supervisor = spawn_worker_pool(worker_count, &client, dispatch_rx, results_tx);
    let builder = tokio::spawn(run_builder(plan, dispatch_tx));
    let aggregator = spawn_aggregator(results_rx, trace_sink, worker_count);

    let aggregated = aggregator
        .await
        .inspect_err(|err| error!("Aggregator task failed: {}", err))?;
    let supervised = supervisor.await?;
    let built = builder.await?;

    // The aggregator's failure is the root cause when it stops early: workers
    // then lose their result channel and the builder its receivers.
    let statistics = aggregated.inspect_err(|err| error!("Aggregation failed: {}", err))?;
    supervised?;
    let sent = built?;

    if statistics.observed() != sent {
        return Err(AppError::pipeline(PipelineError::ResultCountMismatch {
            observed: statistics.observed(),
            expected: sent,
        }));
    }

    Ok(statistics)
}
