//! Core configuration
//!
//! Defaults come from [`crate::constants`]; `Config::from_env` overlays
//! `APIPROBE_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{DATA_DIR_NAME, DEFAULT_TIMEOUT_SECS, STORE_FILE_NAME};

/// How the response view treats outcomes that resolve out of issue order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Every completion replaces the current outcome, in completion order.
    #[default]
    CompletionOrder,
    /// An outcome older than the newest applied one is dropped.
    LatestIssued,
}

/// Runtime configuration for the core
#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub store_file: String,
    pub request_timeout: Duration,
    /// `None` keeps every history record.
    pub history_limit: Option<usize>,
    pub ordering: OrderingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DATA_DIR_NAME);

        Config {
            data_dir,
            store_file: String::from(STORE_FILE_NAME),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            history_limit: None,
            ordering: OrderingPolicy::CompletionOrder,
        }
    }
}

impl Config {
    /// Defaults overlaid with `APIPROBE_HOME`, `APIPROBE_TIMEOUT_SECS`
    /// and `APIPROBE_HISTORY_LIMIT`
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Full path of the persisted store snapshot
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(&self.store_file)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(home) = lookup("APIPROBE_HOME").filter(|v| !v.trim().is_empty()) {
            self.data_dir = PathBuf::from(home);
        }

        if let Some(raw) = lookup("APIPROBE_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid APIPROBE_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = lookup("APIPROBE_HISTORY_LIMIT") {
            match raw.trim().parse::<usize>() {
                Ok(0) => self.history_limit = None,
                Ok(limit) => self.history_limit = Some(limit),
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid APIPROBE_HISTORY_LIMIT"),
            }
        }

        self
    }
}
