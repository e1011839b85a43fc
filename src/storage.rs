use crate::config::Config;
use crate::error::{PersistError, StoreError};
use crate::models::{Environment, HistoryRecord, RequestDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Everything the store persists, as one YAML document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub environments: Vec<Environment>,
    #[serde(default)]
    pub current_environment: Option<Uuid>,
    #[serde(default)]
    pub history: VecDeque<HistoryRecord>,
    #[serde(default)]
    pub favorites: VecDeque<HistoryRecord>,
}

/// Environments, request history and favorites, persisted on every mutation.
///
/// The in-memory state is authoritative: a failed write is logged and kept in
/// [`Store::last_persist_error`] but never rolls a mutation back. Mutating
/// calls must not be issued concurrently.
#[derive(Debug)]
pub struct Store {
    data: StoreSnapshot,
    path: Option<PathBuf>,
    history_limit: Option<usize>,
    last_persist_error: Option<String>,
}

impl Store {
    /// Loads the snapshot at `path`; a missing or unreadable file starts empty
    pub fn open(path: impl Into<PathBuf>, history_limit: Option<usize>) -> Self {
        let path = path.into();
        let data = load_snapshot(&path).unwrap_or_default();
        tracing::info!(
            path = %path.display(),
            environments = data.environments.len(),
            history = data.history.len(),
            favorites = data.favorites.len(),
            "Store loaded"
        );

        Store {
            data,
            path: Some(path),
            history_limit,
            last_persist_error: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(config.store_path(), config.history_limit)
    }

    /// Store with no backing file
    pub fn in_memory() -> Self {
        Store {
            data: StoreSnapshot::default(),
            path: None,
            history_limit: None,
            last_persist_error: None,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> &StoreSnapshot {
        &self.data
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // ========================
    // Environments
    // ========================

    pub fn environments(&self) -> &[Environment] {
        &self.data.environments
    }

    pub fn add_environment(&mut self, environment: Environment) -> Uuid {
        let id = environment.id;
        self.data.environments.push(environment);
        self.persist();
        id
    }

    pub fn switch_environment(&mut self, id: Uuid) -> Result<(), StoreError> {
        if !self.data.environments.iter().any(|e| e.id == id) {
            return Err(StoreError::EnvironmentNotFound(id));
        }
        self.data.current_environment = Some(id);
        self.persist();
        Ok(())
    }

    pub fn clear_environment(&mut self) {
        self.data.current_environment = None;
        self.persist();
    }

    pub fn remove_environment(&mut self, id: Uuid) -> Result<Environment, StoreError> {
        let index = self
            .data
            .environments
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::EnvironmentNotFound(id))?;
        let removed = self.data.environments.remove(index);
        if self.data.current_environment == Some(id) {
            self.data.current_environment = None;
        }
        self.persist();
        Ok(removed)
    }

    pub fn current_environment(&self) -> Option<&Environment> {
        let id = self.data.current_environment?;
        self.data.environments.iter().find(|e| e.id == id)
    }

    // ========================
    // History
    // ========================

    pub fn history(&self) -> &VecDeque<HistoryRecord> {
        &self.data.history
    }

    pub fn history_record(&self, id: Uuid) -> Option<&HistoryRecord> {
        self.data.history.iter().find(|r| r.id == id)
    }

    /// Prepends a by-value snapshot of `descriptor`, without draft rows
    pub fn record_history(&mut self, descriptor: &RequestDescriptor) -> Uuid {
        let record = HistoryRecord::new(descriptor.snapshot());
        let id = record.id;
        self.data.history.push_front(record);
        if let Some(limit) = self.history_limit {
            self.data.history.truncate(limit);
        }
        self.persist();
        id
    }

    /// Drops every history record; favorites are untouched
    pub fn clear_history(&mut self) {
        self.data.history.clear();
        self.persist();
    }

    // ========================
    // Favorites
    // ========================

    pub fn favorites(&self) -> &VecDeque<HistoryRecord> {
        &self.data.favorites
    }

    pub fn favorites_in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a HistoryRecord> + 'a {
        self.data
            .favorites
            .iter()
            .filter(move |r| r.group_name.as_deref() == Some(group))
    }

    pub fn promote_favorite(&mut self, record_id: Uuid) -> Result<(), StoreError> {
        self.promote_favorite_in_group(record_id, None)
    }

    /// Clones the history record into favorites, replacing an earlier
    /// promotion of the same record
    pub fn promote_favorite_in_group(
        &mut self,
        record_id: Uuid,
        group: Option<String>,
    ) -> Result<(), StoreError> {
        let mut favorite = self
            .history_record(record_id)
            .cloned()
            .ok_or(StoreError::RecordNotFound(record_id))?;
        favorite.is_favorite = true;
        favorite.group_name = group;

        self.data.favorites.retain(|r| r.id != record_id);
        self.data.favorites.push_front(favorite);
        self.persist();
        Ok(())
    }

    /// Removes a favorite; returns false (and changes nothing) if absent
    pub fn demote_favorite(&mut self, record_id: Uuid) -> bool {
        let before = self.data.favorites.len();
        self.data.favorites.retain(|r| r.id != record_id);
        if self.data.favorites.len() == before {
            return false;
        }
        self.persist();
        true
    }

    // ========================
    // Persistence
    // ========================

    /// Writes the full snapshot now
    pub fn save(&mut self) -> Result<(), StoreError> {
        let Some(path) = self.path.clone() else {
            return Ok(());
        };
        match write_snapshot(&path, &self.data) {
            Ok(()) => {
                self.last_persist_error = None;
                Ok(())
            }
            Err(source) => {
                self.last_persist_error = Some(source.to_string());
                Err(StoreError::Persistence { path, source })
            }
        }
    }

    /// Final persist on teardown
    pub fn close(mut self) -> Result<(), StoreError> {
        self.save()
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::error!(error = %e, "Failed to persist store");
        }
    }
}

fn load_snapshot(path: &Path) -> Option<StoreSnapshot> {
    if !path.exists() {
        return None;
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Unreadable store, starting empty");
            return None;
        }
    };

    match serde_yaml::from_str::<StoreSnapshot>(&content) {
        Ok(mut snapshot) => {
            let current = snapshot.current_environment;
            if current.is_some_and(|id| !snapshot.environments.iter().any(|e| e.id == id)) {
                snapshot.current_environment = None;
            }
            Some(snapshot)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Corrupt store, starting empty");
            None
        }
    }
}

fn write_snapshot(path: &Path, snapshot: &StoreSnapshot) -> Result<(), PersistError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
    }

    let content = serde_yaml::to_string(snapshot)?;
    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
