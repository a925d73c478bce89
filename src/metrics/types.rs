use std::time::Duration;

/// Outcome of one dispatched request, produced by the worker that ran it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestResult {
    pub sequence_id: u64,
    pub worker_id: usize,
    pub byte_size: u64,
    pub status_code: u16,
    pub elapsed: Duration,
    /// Transport failure message. Any HTTP status, 5xx included, leaves this empty.
    pub error: Option<String>,
}

impl RequestResult {
    #[must_use]
    pub const fn completed(
        sequence_id: u64,
        worker_id: usize,
        elapsed: Duration,
        status_code: u16,
        byte_size: u64,
    ) -> Self {
        Self {
            sequence_id,
            worker_id,
            byte_size,
            status_code,
            elapsed,
            error: None,
        }
    }

    #[must_use]
    pub const fn failed(
        sequence_id: u64,
        worker_id: usize,
        elapsed: Duration,
        error: String,
    ) -> Self {
        Self {
            sequence_id,
            worker_id,
            byte_size: 0,
            status_code: 0,
            elapsed,
            error: Some(error),
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Final statistics of a run. Duration and size figures cover successful
/// requests only; min/max/averages are zero when nothing succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub concurrency: usize,
    pub completed_count: u64,
    pub error_count: u64,
    pub total_bytes: u64,
    pub total_duration: Duration,
    pub min_duration: Duration,
    pub max_duration: Duration,
    pub average_duration: Duration,
    pub average_size: u64,
    pub wall_clock_total: Duration,
}

impl RunStatistics {
    /// Results observed by the aggregator, successful or not.
    #[must_use]
    pub const fn observed(&self) -> u64 {
        self.completed_count.saturating_add(self.error_count)
    }
}
