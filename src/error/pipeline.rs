use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Worker task failed: {source}")]
    WorkerFailed {
        #[source]
        source: tokio::task::JoinError,
    },
    #[error("Builder stopped after {sent} of {expected} requests; no workers were receiving.")]
    DispatchClosed { sent: u64, expected: u64 },
    #[error("Aggregator saw {observed} results for {expected} requests.")]
    ResultCountMismatch { observed: u64, expected: u64 },
}
