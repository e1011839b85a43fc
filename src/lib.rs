//! # apiprobe
//!
//! Request/response lifecycle core for an interactive HTTP testing tool,
//! similar to Postman/Insomnia minus the UI.
//!
//! ## Features
//! - HTTP methods: GET, POST, PUT, PATCH, DELETE
//! - Header and body rows with stable identities
//! - Raw or key/value (JSON) request bodies
//! - Timing, size and pretty-printed JSON for responses
//! - Environments, request history and favorites persisted to disk
//! - cURL import/export
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (external) - sends [`UiEvent`]s, renders [`RenderState`]s
//! - App Layer (State machine) - owns the editor, response view and store
//! - Network Layer (Tokio runtime) - one task per send, completion order

pub mod app;
pub mod config;
pub mod constants;
pub mod curl;
pub mod error;
pub mod logging;
pub mod messages;
pub mod models;
pub mod network;
pub mod response;
pub mod storage;

// Re-export commonly used types
pub use app::{start, start_default, AppActor, AppState, CoreHandle};
pub use config::{Config, OrderingPolicy};
pub use curl::{parse_curl, to_curl};
pub use error::{ListError, StoreError, TransportError, ValidationError};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, RowList, UiEvent};
pub use models::{Environment, HistoryRecord, HttpMethod, KeyValue, KeyValueList, RequestDescriptor};
pub use network::{RequestExecutor, ReqwestTransport, Transport};
pub use response::{ResponseHeaders, ResponseOutcome, ResponseView, SendTicket};
pub use storage::{Store, StoreSnapshot};
