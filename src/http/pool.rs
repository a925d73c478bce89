use std::time::Instant;

use reqwest::Client;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, error, warn};

use crate::error::{AppError, AppResult, PipelineError};
use crate::metrics::RequestResult;
use crate::requests::RequestDescriptor;

use super::execution::{describe_error, execute_descriptor};

/// Starts `concurrency` workers on the dispatch channel plus the supervisor
/// that owns the last result sender.
///
/// The returned handle resolves once every worker has exited; by then the
/// result channel is closed. A panicked worker is reported as
/// [`PipelineError::WorkerFailed`].
#[must_use]
pub(crate) fn spawn_worker_pool(
    concurrency: usize,
    client: &Client,
    dispatch_rx: flume::Receiver<RequestDescriptor>,
    results_tx: mpsc::Sender<RequestResult>,
) -> JoinHandle<AppResult<()>> {
    let mut worker_handles = Vec::with_capacity(concurrency);
    for worker_id in 0..concurrency {
        worker_handles.push(tokio::spawn(run_worker(
            worker_id,
            client.clone(),
            dispatch_rx.clone(),
            results_tx.clone(),
        )));
    }
    drop(dispatch_rx);

    tokio::spawn(supervise(worker_handles, results_tx))
}

pub(super) async fn supervise(
    worker_handles: Vec<JoinHandle<u64>>,
    results_tx: mpsc::Sender<RequestResult>,
) -> AppResult<()> {
    let worker_count = worker_handles.len();
    let mut handled: u64 = 0;
    let mut first_failure = None;

    for handle in worker_handles {
        match handle.await {
            Ok(count) => handled = handled.saturating_add(count),
            Err(err) => {
                error!("Worker task failed: {}", err);
                if first_failure.is_none() {
                    first_failure = Some(err);
                }
            }
        }
    }

    // Workers only hold clones; this drop is what closes the result channel.
    drop(results_tx);
    debug!(
        "{} workers finished after {} requests; result channel closed",
        worker_count, handled
    );

    match first_failure {
        Some(source) => Err(AppError::pipeline(PipelineError::WorkerFailed { source })),
        None => Ok(()),
    }
}

async fn run_worker(
    worker_id: usize,
    client: Client,
    dispatch_rx: flume::Receiver<RequestDescriptor>,
    results_tx: mpsc::Sender<RequestResult>,
) -> u64 {
    let mut handled: u64 = 0;

    while let Ok(descriptor) = dispatch_rx.recv_async().await {
        let sequence_id = descriptor.sequence_id;
        let start = Instant::now();
        let outcome = execute_descriptor(&client, descriptor).await;
        let elapsed = start.elapsed();

        let result = match outcome {
            Ok((status_code, byte_size)) => {
                RequestResult::completed(sequence_id, worker_id, elapsed, status_code, byte_size)
            }
            Err(err) => {
                let message = describe_error(&err);
                debug!("Request {} failed on worker {}: {}", sequence_id, worker_id, message);
                RequestResult::failed(sequence_id, worker_id, elapsed, message)
            }
        };

        if results_tx.send(result).await.is_err() {
            warn!("Result channel closed; worker {} stopping", worker_id);
            break;
        }
        handled = handled.saturating_add(1);
    }

    handled
}
