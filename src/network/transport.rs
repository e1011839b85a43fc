//! Transport seam between the executor and the HTTP client

use std::future::Future;
use std::pin::Pin;

use reqwest::Url;

use crate::error::TransportError;
use crate::models::HttpMethod;

/// Boxed future returned by [`Transport::dispatch`]
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Fully resolved request, ready to go on the wire
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireRequest {
    pub method: HttpMethod,
    pub url: Url,
    /// One entry per header name (case-insensitive), last value kept.
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl WireRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Raw response as received from the transport
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Performs exactly one network attempt per call
pub trait Transport: Send + Sync {
    fn dispatch(&self, request: WireRequest) -> BoxFuture<'_, Result<WireResponse, TransportError>>;
}
