//! App actor - message loop processing UI events and network responses

use tokio::sync::mpsc;

use crate::app::state::AppState;
use crate::error::StoreError;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};

/// App actor that processes UI events and network responses
pub struct AppActor {
    state: AppState,
    network_tx: mpsc::UnboundedSender<NetworkCommand>,
    render_tx: mpsc::UnboundedSender<RenderState>,
}

impl AppActor {
    pub fn new(
        state: AppState,
        network_tx: mpsc::UnboundedSender<NetworkCommand>,
        render_tx: mpsc::UnboundedSender<RenderState>,
    ) -> Self {
        AppActor {
            state,
            network_tx,
            render_tx,
        }
    }

    /// Run the actor message loop until `Quit` or the UI hangs up, then
    /// drain in-flight sends and persist the store one last time
    pub async fn run(
        mut self,
        mut ui_rx: mpsc::UnboundedReceiver<UiEvent>,
        mut net_rx: mpsc::UnboundedReceiver<NetworkResponse>,
    ) -> Result<(), StoreError> {
        // Send initial render state
        self.publish();

        loop {
            tokio::select! {
                event = ui_rx.recv() => {
                    match event {
                        Some(event) => {
                            if self.handle_ui_event(event) {
                                break;
                            }
                            self.publish();
                        }
                        None => break,
                    }
                }
                Some(response) = net_rx.recv() => {
                    self.state.handle_response(response);
                    self.publish();
                }
            }
        }

        let _ = self.network_tx.send(NetworkCommand::Shutdown);
        while let Some(response) = net_rx.recv().await {
            self.state.handle_response(response);
            self.publish();
        }

        tracing::info!("App actor stopped, persisting store");
        self.state.store.close()
    }

    fn publish(&self) {
        let _ = self.render_tx.send(self.state.to_render_state());
    }

    /// Handle a UI event, returns true if quit was requested
    fn handle_ui_event(&mut self, event: UiEvent) -> bool {
        let state = &mut self.state;
        state.notice = None;

        let result: Result<(), String> = match event {
            // Descriptor edits
            UiEvent::SetUrl(url) => {
                state.set_url(url);
                Ok(())
            }
            UiEvent::SetMethod(method) => {
                state.set_method(method);
                Ok(())
            }
            UiEvent::CycleMethod => {
                state.cycle_method();
                Ok(())
            }
            UiEvent::AppendRow(list) => {
                state.append_row(list);
                Ok(())
            }
            UiEvent::UpdateRow { list, index, key, value } => {
                state.update_row(list, index, key, value).map_err(|e| e.to_string())
            }
            UiEvent::RemoveRow { list, index } => state.remove_row(list, index).map_err(|e| e.to_string()),
            UiEvent::ClearRows(list) => {
                state.clear_rows(list);
                Ok(())
            }
            UiEvent::SetRawBody(raw) => {
                state.set_raw_body(raw);
                Ok(())
            }
            UiEvent::SetUseRawBody(use_raw) => {
                state.set_use_raw_body(use_raw);
                Ok(())
            }
            UiEvent::NewRequest => {
                state.new_request();
                Ok(())
            }

            // Request actions
            UiEvent::SendRequest => {
                let cmd = state.prepare_send();
                let _ = self.network_tx.send(cmd);
                Ok(())
            }

            // Environments
            UiEvent::AddEnvironment(environment) => {
                state.add_environment(environment);
                Ok(())
            }
            UiEvent::SwitchEnvironment(id) => state.switch_environment(id).map_err(|e| e.to_string()),
            UiEvent::RemoveEnvironment(id) => state.remove_environment(id).map_err(|e| e.to_string()),
            UiEvent::ClearEnvironment => {
                state.clear_environment();
                Ok(())
            }

            // History & favorites
            UiEvent::LoadHistory(id) => state.load_history(id).map_err(|e| e.to_string()),
            UiEvent::LoadFavorite(id) => state.load_favorite(id).map_err(|e| e.to_string()),
            UiEvent::PromoteFavorite { record_id, group } => {
                state.promote_favorite(record_id, group).map_err(|e| e.to_string())
            }
            UiEvent::DemoteFavorite(id) => {
                state.demote_favorite(id);
                Ok(())
            }
            UiEvent::ClearHistory => {
                state.clear_history();
                Ok(())
            }

            // cURL
            UiEvent::ImportCurl(command) => state.import_curl(&command).map_err(|e| e.to_string()),
            UiEvent::ExportCurl => {
                state.export_curl();
                Ok(())
            }

            // System
            UiEvent::Quit => return true,
        };

        if let Err(message) = result {
            tracing::warn!(%message, "UI event rejected");
            self.state.notice = Some(message);
        }

        false
    }
}
