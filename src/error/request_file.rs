use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestFileError {
    #[error("Failed to read request file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse request file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Request file '{path}' contains no requests.")]
    Empty { path: PathBuf },
}
