use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to render summary: {source}")]
    RenderSummary {
        #[source]
        source: std::fmt::Error,
    },
}
