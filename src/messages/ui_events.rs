//! UI events - operations the UI collaborator asks the App layer to perform

use uuid::Uuid;

use crate::models::{Environment, HttpMethod};

/// Which key/value list of the descriptor an edit targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowList {
    Headers,
    Body,
}

/// Events generated by the UI layer
#[derive(Debug, Clone)]
pub enum UiEvent {
    // Descriptor edits
    SetUrl(String),
    SetMethod(HttpMethod),
    CycleMethod,
    AppendRow(RowList),
    UpdateRow {
        list: RowList,
        index: usize,
        key: String,
        value: String,
    },
    RemoveRow {
        list: RowList,
        index: usize,
    },
    ClearRows(RowList),
    SetRawBody(String),
    SetUseRawBody(bool),
    /// Fresh descriptor, pre-filled from the current environment if any
    NewRequest,

    // Request actions
    SendRequest,

    // Environments
    AddEnvironment(Environment),
    SwitchEnvironment(Uuid),
    RemoveEnvironment(Uuid),
    ClearEnvironment,

    // History & favorites
    LoadHistory(Uuid),
    LoadFavorite(Uuid),
    PromoteFavorite {
        record_id: Uuid,
        group: Option<String>,
    },
    DemoteFavorite(Uuid),
    ClearHistory,

    // cURL
    ImportCurl(String),
    ExportCurl,

    // System
    Quit,
}
