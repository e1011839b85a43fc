//! Scripted in-memory transport for tests

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::network::transport::{BoxFuture, Transport, WireRequest, WireResponse};

struct Step {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<WireResponse, TransportError>,
}

/// Replays queued results in call order; unscripted calls get an empty 200.
/// A gated step does not resolve until its sender fires.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    calls: AtomicUsize,
    requests: Mutex<Vec<WireRequest>>,
    script: Mutex<VecDeque<Step>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, headers: &[(&str, &str)], body: &[u8]) {
        self.push(None, Ok(response(status, headers, body)));
    }

    pub(crate) fn fail(&self, error: TransportError) {
        self.push(None, Err(error));
    }

    /// Queues a response held back until the returned sender fires
    pub(crate) fn respond_gated(&self, status: u16, body: &[u8]) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Some(rx), Ok(response(status, &[], body)));
        tx
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn push(&self, gate: Option<oneshot::Receiver<()>>, result: Result<WireResponse, TransportError>) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(Step { gate, result });
        }
    }
}

fn response(status: u16, headers: &[(&str, &str)], body: &[u8]) -> WireResponse {
    WireResponse {
        status,
        headers: headers
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        body: body.to_vec(),
    }
}

impl Transport for ScriptedTransport {
    fn dispatch(&self, request: WireRequest) -> BoxFuture<'_, Result<WireResponse, TransportError>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        let step = self.script.lock().ok().and_then(|mut s| s.pop_front());

        Box::pin(async move {
            match step {
                Some(Step { gate, result }) => {
                    if let Some(gate) = gate {
                        let _ = gate.await;
                    }
                    result
                }
                None => Ok(WireResponse {
                    status: 200,
                    ..WireResponse::default()
                }),
            }
        })
    }
}
