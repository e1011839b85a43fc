//! App layer - central state management and command processing
//!
//! The App actor receives UI events and network responses,
//! updates state, and emits network commands and render state.

pub mod actor;
pub mod commands;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use actor::AppActor;
pub use state::{AppState, PendingSend};

use crate::config::Config;
use crate::error::StoreError;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use crate::network::{NetworkActor, RequestExecutor, ReqwestTransport, Transport};
use crate::storage::Store;

/// Handle held by the UI collaborator: push events, read render states
pub struct CoreHandle {
    pub events: mpsc::UnboundedSender<UiEvent>,
    pub renders: mpsc::UnboundedReceiver<RenderState>,
    app_task: JoinHandle<Result<(), StoreError>>,
    network_task: JoinHandle<()>,
}

impl CoreHandle {
    /// Quits, waits for in-flight sends, and performs the final persist
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.events.send(UiEvent::Quit);
        let persisted = self.app_task.await.context("app actor panicked")?;
        self.network_task.await.context("network actor panicked")?;
        persisted.context("final persist failed")
    }
}

/// Loads the store, spawns both actors over the given transport.
/// Must be called from within a Tokio runtime.
pub fn start(config: &Config, transport: Arc<dyn Transport>) -> CoreHandle {
    let store = Store::from_config(config);
    let state = AppState::new(store, config.ordering);
    spawn(state, RequestExecutor::new(transport))
}

/// [`start`] with the reqwest transport configured from `config`
pub fn start_default(config: &Config) -> CoreHandle {
    start(config, Arc::new(ReqwestTransport::new(config.request_timeout)))
}

fn spawn(state: AppState, executor: RequestExecutor) -> CoreHandle {
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, render_rx) = mpsc::unbounded_channel::<RenderState>();

    let network_actor = NetworkActor::new(executor, net_resp_tx);
    let network_task = tokio::spawn(network_actor.run(net_cmd_rx));

    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    let app_task = tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    tracing::info!("Core started");
    CoreHandle {
        events: ui_tx,
        renders: render_rx,
        app_task,
        network_task,
    }
}
