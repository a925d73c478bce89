use std::path::Path;

use crate::error::{AppError, AppResult, RequestFileError};

use super::descriptor::RequestSpec;

/// Reads a request file: a JSON array of `{"url", "method", "body"}` objects
/// where `method` and `body` are optional.
///
/// # Errors
///
/// Returns an error when the file cannot be read, is not a valid request
/// list, or contains no requests.
pub fn read_request_file(path: &Path) -> AppResult<Vec<RequestSpec>> {
    let content = std::fs::read(path).map_err(|err| {
        AppError::request_file(RequestFileError::Read {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    let specs: Vec<RequestSpec> = serde_json::from_slice(&content).map_err(|err| {
        AppError::request_file(RequestFileError::Parse {
            path: path.to_path_buf(),
            source: err,
        })
    })?;
    if specs.is_empty() {
        return Err(AppError::request_file(RequestFileError::Empty {
            path: path.to_path_buf(),
        }));
    }
    Ok(specs)
}
