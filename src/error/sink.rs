use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to open trace dump '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write trace row: {source}")]
    WriteRow {
        #[source]
        source: csv::Error,
    },
    #[error("Failed to flush trace dump: {source}")]
    Flush {
        #[source]
        source: std::io::Error,
    },
}
