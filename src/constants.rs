//! Application constants
//!
//! Centralized location for magic strings and configuration defaults.

/// Application name
pub const APP_NAME: &str = "apiprobe";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory under the home directory holding persisted state
pub const DATA_DIR_NAME: &str = ".apiprobe";

/// File name of the persisted environment/history/favorites snapshot
pub const STORE_FILE_NAME: &str = "store.yaml";

/// File name of the rolling log written by `logging::init_file_logging`
pub const LOG_FILE_NAME: &str = "apiprobe.log";

/// Network timeout applied by the default client
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Prefix for the textual projection of a failed send
pub const FAILURE_MARKER: &str = "Error: ";

/// Failure message for a URL that is empty or not absolute http(s)
pub const INVALID_URL_MESSAGE: &str = "invalid URL";

/// Failure message for a structured body that cannot be encoded
pub const INVALID_BODY_MESSAGE: &str = "invalid body";

/// Content type attached to structured (key/value) bodies
pub const JSON_CONTENT_TYPE: &str = "application/json";
