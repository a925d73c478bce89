mod app;
mod config;
mod http;
mod output;
mod pipeline;
mod request_file;
mod sink;
mod validation;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use http::HttpError;
pub use output::OutputError;
pub use pipeline::PipelineError;
pub use request_file::RequestFileError;
pub use sink::SinkError;
pub use validation::ValidationError;
