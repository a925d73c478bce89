use reqwest::{Method, Url};
use tracing::{debug, info};

use crate::error::{AppError, AppResult, PipelineError, ValidationError};

use super::descriptor::{RequestDescriptor, RequestSpec, resolve_method};
use super::unique::stamp_unique;

/// Where the requests of a run come from.
#[derive(Debug, Clone)]
pub enum RequestSource {
    /// The same URL sent `count` times.
    Repeat { url: String, count: u64 },
    /// Requests read from a request file, in file order.
    List(Vec<RequestSpec>),
}

#[derive(Debug)]
struct PreparedRequest {
    url: Url,
    method: Method,
    body: Option<String>,
}

#[derive(Debug)]
enum PlanEntries {
    Repeat { url: Url, count: u64 },
    List(Vec<PreparedRequest>),
}

/// Validated request source. Every URL and method has already been checked,
/// so producing descriptors from a plan cannot fail.
#[derive(Debug)]
pub struct RequestPlan {
    entries: PlanEntries,
    unique: bool,
}

impl RequestPlan {
    /// Validates a request source.
    ///
    /// # Errors
    ///
    /// Returns an error when a URL cannot be parsed, is not http(s), or has no
    /// host, or when a request names an invalid HTTP method.
    pub fn prepare(source: RequestSource, unique: bool) -> AppResult<Self> {
        let entries = match source {
            RequestSource::Repeat { url, count } => PlanEntries::Repeat {
                url: parse_target_url(&url)?,
                count,
            },
            RequestSource::List(specs) => {
                let mut prepared = Vec::with_capacity(specs.len());
                for (index, spec) in specs.into_iter().enumerate() {
                    prepared.push(prepare_spec(index, spec)?);
                }
                PlanEntries::List(prepared)
            }
        };
        Ok(Self { entries, unique })
    }

    /// Number of descriptors this plan produces.
    #[must_use]
    pub fn len(&self) -> u64 {
        match &self.entries {
            PlanEntries::Repeat { count, .. } => *count,
            PlanEntries::List(list) => u64::try_from(list.len()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Descriptors in dispatch order. Generated lazily so repeat mode does not
    /// hold `count` descriptors in memory; the unique stamp is taken as each
    /// descriptor is produced.
    pub fn into_descriptors(self) -> impl Iterator<Item = RequestDescriptor> {
        let unique = self.unique;
        let descriptors: Box<dyn Iterator<Item = RequestDescriptor> + Send> = match self.entries {
            PlanEntries::Repeat { url, count } => {
                Box::new((0..count).map(move |sequence_id| RequestDescriptor {
                    sequence_id,
                    target_url: url.clone(),
                    method: Method::GET,
                    body: None,
                }))
            }
            PlanEntries::List(list) => {
                Box::new(list.into_iter().zip(0u64..).map(|(request, sequence_id)| {
                    RequestDescriptor {
                        sequence_id,
                        target_url: request.url,
                        method: request.method,
                        body: request.body,
                    }
                }))
            }
        };
        descriptors.map(move |mut descriptor| {
            if unique {
                stamp_unique(&mut descriptor.target_url);
            }
            descriptor
        })
    }
}

fn prepare_spec(index: usize, spec: RequestSpec) -> AppResult<PreparedRequest> {
    let url = parse_target_url(&spec.url)?;
    let body = spec.body.filter(|body| !body.is_empty());
    let explicit = match spec.method.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            Method::from_bytes(raw.to_ascii_uppercase().as_bytes()).map_err(|_err| {
                AppError::validation(ValidationError::InvalidMethod {
                    method: raw.to_owned(),
                    index,
                })
            })?,
        ),
    };
    let method = resolve_method(explicit, body.as_deref());
    Ok(PreparedRequest { url, method, body })
}

fn parse_target_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::validation(ValidationError::UnsupportedScheme {
            url: raw.to_owned(),
        }));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost {
            url: raw.to_owned(),
        }));
    }
    Ok(url)
}

/// Pushes every descriptor of `plan` into the dispatch channel, then closes it
/// by dropping the sender. Each send waits until a worker takes the previous
/// descriptor, so production is throttled to consumption.
///
/// # Errors
///
/// Returns an error when every worker stopped receiving before the plan was
/// fully dispatched.
pub(crate) async fn run_builder(
    plan: RequestPlan,
    dispatch_tx: flume::Sender<RequestDescriptor>,
) -> AppResult<u64> {
    let expected = plan.len();
    let mut sent: u64 = 0;
    for descriptor in plan.into_descriptors() {
        if dispatch_tx.send_async(descriptor).await.is_err() {
            return Err(AppError::pipeline(PipelineError::DispatchClosed {
                sent,
                expected,
            }));
        }
        sent = sent.saturating_add(1);
    }
    drop(dispatch_tx);
    debug!("Dispatch channel closed after {} requests", sent);
    info!("Finished sending requests");
    Ok(sent)
}
