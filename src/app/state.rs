//! App state - pure data structure with no I/O logic beyond the store

use std::collections::HashMap;

use crate::config::OrderingPolicy;
use crate::messages::{NetworkCommand, NetworkResponse, RenderState};
use crate::models::RequestDescriptor;
use crate::response::{ResponseView, SendTicket};
use crate::storage::Store;

/// A send that has been issued but not yet resolved
#[derive(Clone, Debug)]
pub struct PendingSend {
    pub ticket: SendTicket,
    /// Descriptor as it was when the user pressed send
    pub request: RequestDescriptor,
}

/// Main application state - owned by a single task
pub struct AppState {
    // Request being edited
    pub request: RequestDescriptor,

    // Response view model
    pub response: ResponseView,
    pub next_request_id: u64,
    pub pending: HashMap<u64, PendingSend>,

    // Persisted data
    pub store: Store,

    // Feedback for the UI
    pub curl_export: Option<String>,
    pub notice: Option<String>,
}

impl AppState {
    pub fn new(store: Store, ordering: OrderingPolicy) -> Self {
        AppState {
            request: RequestDescriptor::default(),
            response: ResponseView::new(ordering),
            next_request_id: 1,
            pending: HashMap::new(),
            store,
            curl_export: None,
            notice: None,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Snapshots the current descriptor and marks the view as loading.
    /// A send already in flight is neither cancelled nor awaited.
    pub fn prepare_send(&mut self) -> NetworkCommand {
        let id = self.next_id();
        let ticket = self.response.begin_send();
        let request = self.request.clone();
        self.pending.insert(
            id,
            PendingSend {
                ticket,
                request: request.clone(),
            },
        );
        tracing::info!(id, url = %request.url, method = %request.method, "Send issued");
        NetworkCommand::Send { id, request }
    }

    /// Applies an outcome in arrival order; a success is recorded to history
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let NetworkResponse::Completed { id, outcome } = response;

        let Some(pending) = self.pending.remove(&id) else {
            tracing::warn!(id, "Outcome for unknown send ignored");
            return;
        };

        let succeeded = outcome.is_success();
        let applied = self.response.complete_send(pending.ticket, outcome);
        tracing::debug!(id, applied, succeeded, "Send completed");

        if succeeded {
            self.store.record_history(&pending.request);
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let snapshot = self.store.snapshot();
        RenderState {
            request: self.request.clone(),
            is_loading: self.response.is_loading(),
            outcome: self.response.current().cloned(),
            pretty_body: self.response.pretty_projection(),
            status_line: self.response.status_line(),
            environments: snapshot.environments.clone(),
            current_environment: self.store.current_environment().map(|e| e.id),
            history: snapshot.history.iter().cloned().collect(),
            favorites: snapshot.favorites.iter().cloned().collect(),
            curl_export: self.curl_export.clone(),
            notice: self.notice.clone(),
            persist_error: self.store.last_persist_error().map(String::from),
        }
    }
}
