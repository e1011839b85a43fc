//! Request executor - turns a descriptor into exactly one network attempt
//! and normalizes whatever comes back into a [`ResponseOutcome`]

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::{HeaderName, HeaderValue};
use reqwest::Url;

use crate::constants::JSON_CONTENT_TYPE;
use crate::error::ValidationError;
use crate::models::RequestDescriptor;
use crate::network::transport::{Transport, WireRequest};
use crate::response::{ResponseHeaders, ResponseOutcome};

/// Sends descriptors through a [`Transport`].
///
/// Holds no state of its own; clones share the transport and may send
/// concurrently. No retries, no cancellation.
#[derive(Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn Transport>,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        RequestExecutor { transport }
    }

    /// Never fails: validation and transport problems come back as
    /// [`ResponseOutcome::Failure`]
    pub async fn send(&self, descriptor: &RequestDescriptor) -> ResponseOutcome {
        let request = match build_wire_request(descriptor) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(url = %descriptor.url, error = %e, "Request rejected before dispatch");
                return ResponseOutcome::failure(e.to_string(), None);
            }
        };

        tracing::info!(url = %request.url, method = %request.method, "Executing request");
        let start = Instant::now();
        let result = self.transport.dispatch(request).await;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(resp) => {
                tracing::info!(status = resp.status, duration_ms, bytes = resp.body.len(), "Request completed");
                ResponseOutcome::Success {
                    status_code: resp.status,
                    headers: resp.headers.into_iter().collect::<ResponseHeaders>(),
                    size_bytes: resp.body.len(),
                    body: String::from_utf8_lossy(&resp.body).into_owned(),
                    duration_ms,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, duration_ms, "Request failed");
                ResponseOutcome::failure(e.to_string(), Some(duration_ms))
            }
        }
    }
}

/// Resolves a descriptor into a wire request without touching the network
pub fn build_wire_request(descriptor: &RequestDescriptor) -> Result<WireRequest, ValidationError> {
    let url = parse_url(&descriptor.url)?;
    let mut headers = collect_headers(descriptor)?;

    let body = if !descriptor.method.has_body() {
        None
    } else if descriptor.use_raw_body {
        Some(descriptor.raw_body.clone().into_bytes())
    } else {
        let object = descriptor.body.to_object();
        if object.is_empty() {
            None
        } else {
            let encoded = serde_json::to_vec(&object).map_err(|_| ValidationError::InvalidBody)?;
            if !headers.iter().any(|(k, _)| k.eq_ignore_ascii_case("content-type")) {
                headers.push((String::from("Content-Type"), String::from(JSON_CONTENT_TYPE)));
            }
            Some(encoded)
        }
    };

    Ok(WireRequest {
        method: descriptor.method,
        url,
        headers,
        body,
    })
}

fn parse_url(raw: &str) -> Result<Url, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidUrl);
    }
    let url = Url::parse(trimmed).map_err(|_| ValidationError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        _ => Err(ValidationError::InvalidUrl),
    }
}

/// Non-empty header rows, one per name; a repeated name keeps the first
/// position and the last value
fn collect_headers(descriptor: &RequestDescriptor) -> Result<Vec<(String, String)>, ValidationError> {
    let mut headers: Vec<(String, String)> = Vec::new();

    for kv in descriptor.headers.non_empty() {
        let name = kv.key.trim();
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ValidationError::InvalidHeader(kv.key.clone()))?;
        HeaderValue::from_bytes(kv.value.as_bytes()).map_err(|_| ValidationError::InvalidHeader(kv.key.clone()))?;

        match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some(existing) => existing.1 = kv.value.clone(),
            None => headers.push((name.to_string(), kv.value.clone())),
        }
    }

    Ok(headers)
}
