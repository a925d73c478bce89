//! Per-request results and the streaming aggregator that reduces them.
mod aggregator;
mod types;

#[cfg(test)]
mod tests;

pub use aggregator::StatsAccumulator;
pub use types::{RequestResult, RunStatistics};

pub(crate) use aggregator::spawn_aggregator;
