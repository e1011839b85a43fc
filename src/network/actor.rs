//! Network actor - runs each send as its own task in the Tokio runtime

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::executor::RequestExecutor;

/// Network actor that turns send commands into outcomes.
///
/// Sends overlap freely and are never cancelled; responses go back in the
/// order they finish, not the order they were issued.
pub struct NetworkActor {
    executor: RequestExecutor,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(executor: RequestExecutor, response_tx: mpsc::UnboundedSender<NetworkResponse>) -> Self {
        NetworkActor {
            executor,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        tracing::debug!("Network actor started");
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Send { id, request }) => {
                            let response_tx = self.response_tx.clone();
                            let executor = self.executor.clone();

                            self.active_requests.spawn(async move {
                                tracing::debug!(id, "Send task started");
                                let outcome = executor.send(&request).await;
                                let _ = response_tx.send(NetworkResponse::Completed { id, outcome });
                            });
                        }
                        Some(NetworkCommand::Shutdown) | None => break,
                    }
                }

                Some(result) = self.active_requests.join_next() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Send task aborted");
                    }
                }
            }
        }

        // Let in-flight sends finish so their outcomes are delivered
        while let Some(result) = self.active_requests.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Send task aborted");
            }
        }
        tracing::debug!("Network actor stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, RequestDescriptor};
    use crate::network::testing::ScriptedTransport;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_responses_arrive_in_completion_order() {
        let transport = Arc::new(ScriptedTransport::new());
        let gate_a = transport.respond_gated(200, b"a");
        let gate_b = transport.respond_gated(200, b"b");

        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (resp_tx, mut resp_rx) = mpsc::unbounded_channel();
        let actor = NetworkActor::new(RequestExecutor::new(transport.clone()), resp_tx);
        let handle = tokio::spawn(actor.run(cmd_rx));

        let request = RequestDescriptor {
            url: String::from("https://example.test/"),
            method: HttpMethod::GET,
            ..RequestDescriptor::default()
        };
        for (id, expected_calls) in [(1, 1), (2, 2)] {
            cmd_tx.send(NetworkCommand::Send { id, request: request.clone() }).unwrap();
            while transport.calls() < expected_calls {
                tokio::task::yield_now().await;
            }
        }

        gate_b.send(()).unwrap();
        assert_eq!(resp_rx.recv().await.unwrap().id(), 2);
        gate_a.send(()).unwrap();
        assert_eq!(resp_rx.recv().await.unwrap().id(), 1);

        cmd_tx.send(NetworkCommand::Shutdown).unwrap();
        handle.await.unwrap();
    }
}
