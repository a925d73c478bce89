//! Core library for the `rwrk` CLI.
//!
//! A request builder feeds a bounded dispatch channel, a fixed pool of
//! workers executes the requests, and a single aggregator reduces their
//! results into run statistics and an optional per-request trace. The
//! primary user-facing interface is the `rwrk` command-line application.
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pipeline;
pub mod requests;
pub mod sinks;

mod app;
mod entry;
mod system;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;

pub use entry::run;
