//! HTTP client construction and the worker pool that executes requests.
mod client;
mod execution;
mod pool;

#[cfg(test)]
pub(crate) mod mock_server;
#[cfg(test)]
mod tests;

pub use client::{ClientSettings, build_client};
pub use execution::execute_descriptor;

pub(crate) use pool::spawn_worker_pool;
