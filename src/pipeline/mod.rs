//! Wires the builder, worker pool and aggregator together for one run.
mod orchestrator;


pub use orchestrator::{DISPATCH_CAPACITY, run_pipeline};
