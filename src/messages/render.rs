//! Render state - data structure sent from App layer to UI for rendering

use uuid::Uuid;

use crate::models::{Environment, HistoryRecord, RequestDescriptor};
use crate::response::ResponseOutcome;

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Request being edited
    pub request: RequestDescriptor,

    // Response
    pub is_loading: bool,
    pub outcome: Option<ResponseOutcome>,
    pub pretty_body: String,
    pub status_line: Option<String>,

    // Environments
    pub environments: Vec<Environment>,
    pub current_environment: Option<Uuid>,

    // History & favorites, newest first
    pub history: Vec<HistoryRecord>,
    pub favorites: Vec<HistoryRecord>,

    // Feedback
    pub curl_export: Option<String>,
    /// Last rejected operation (bad index, unknown id, bad cURL)
    pub notice: Option<String>,
    pub persist_error: Option<String>,
}
