//! HTTP client wrapper - reqwest-backed transport

use std::time::Duration;

use reqwest::header::HeaderValue;

use crate::constants::{APP_NAME, APP_VERSION, DEFAULT_TIMEOUT_SECS};
use crate::error::TransportError;
use crate::models::HttpMethod;
use crate::network::transport::{BoxFuture, Transport, WireRequest, WireResponse};

/// Transport that sends requests through a shared `reqwest::Client`
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        ReqwestTransport {
            client: create_client(timeout),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ReqwestTransport { client }
    }

    async fn execute(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let mut req_builder = match request.method {
            HttpMethod::GET => self.client.get(request.url),
            HttpMethod::POST => self.client.post(request.url),
            HttpMethod::PUT => self.client.put(request.url),
            HttpMethod::PATCH => self.client.patch(request.url),
            HttpMethod::DELETE => self.client.delete(request.url),
        };

        for (name, value) in &request.headers {
            let value = HeaderValue::from_bytes(value.as_bytes())
                .map_err(|e| TransportError::Other(format!("invalid header {}: {}", name, e)))?;
            req_builder = req_builder.header(name.as_str(), value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let resp = req_builder.send().await.map_err(classify)?;
        let status = resp.status().as_u16();
        let headers = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = resp
            .bytes()
            .await
            .map_err(|e| TransportError::Other(format!("Error reading body: {}", e)))?;

        Ok(WireResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Transport for ReqwestTransport {
    fn dispatch(&self, request: WireRequest) -> BoxFuture<'_, Result<WireResponse, TransportError>> {
        Box::pin(self.execute(request))
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else if e.is_connect() {
        TransportError::Connect(e.to_string())
    } else {
        TransportError::Other(e.to_string())
    }
}

/// Create an HTTP client with default configuration
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
