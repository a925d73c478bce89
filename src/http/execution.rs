use std::error::Error as _;

use futures_util::StreamExt;
use reqwest::Client;

use crate::requests::RequestDescriptor;

/// Sends one request and drains its body.
///
/// Returns the status code and the number of body bytes read. Any received
/// status is a successful exchange; only transport failures, including a
/// failure while reading the body, are errors.
///
/// # Errors
///
/// Returns the transport error when the request cannot be sent or the body
/// cannot be read to the end.
pub async fn execute_descriptor(
    client: &Client,
    descriptor: RequestDescriptor,
) -> Result<(u16, u64), reqwest::Error> {
    let RequestDescriptor {
        target_url,
        method,
        body,
        ..
    } = descriptor;

    let mut request = client.request(method, target_url);
    if let Some(body) = body {
        request = request.body(body);
    }

    let response = request.send().await?;
    let status = response.status().as_u16();
    let bytes = drain_response_body(response).await?;
    Ok((status, bytes))
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

/// Renders a transport error with its source chain, e.g.
/// `error sending request for url (...): tcp connect error: Connection refused`.
pub(crate) fn describe_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}
