use reqwest::{Method, Url};
use serde::Deserialize;

/// One entry of a request file, as written by the user.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RequestSpec {
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// A single request ready to be dispatched to a worker.
#[derive(Debug)]
pub struct RequestDescriptor {
    pub sequence_id: u64,
    pub target_url: Url,
    pub method: Method,
    pub body: Option<String>,
}

/// Explicit method wins, then `POST` when a body is present, else `GET`.
pub(super) fn resolve_method(explicit: Option<Method>, body: Option<&str>) -> Method {
    match (explicit, body) {
        (Some(method), _) => method,
        (None, Some(_)) => Method::POST,
        (None, None) => Method::GET,
    }
}
