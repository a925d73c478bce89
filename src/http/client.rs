use std::time::Duration;

use reqwest::Client;

use crate::args::{DEFAULT_USER_AGENT, WrkArgs};
use crate::error::{AppError, AppResult, HttpError};

/// Transport settings shared by every worker. Unset timeouts keep the
/// client defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientSettings {
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
}

impl ClientSettings {
    #[must_use]
    pub const fn from_args(args: &WrkArgs) -> Self {
        Self {
            request_timeout: args.request_timeout,
            connect_timeout: args.connect_timeout,
        }
    }
}

/// Builds the HTTP client used by all workers of a run.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialized.
pub fn build_client(settings: &ClientSettings) -> AppResult<Client> {
    let mut client_builder = Client::builder().user_agent(DEFAULT_USER_AGENT);

    if let Some(timeout) = settings.request_timeout {
        client_builder = client_builder.timeout(timeout);
    }
    if let Some(timeout) = settings.connect_timeout {
        client_builder = client_builder.connect_timeout(timeout);
    }

    client_builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}
