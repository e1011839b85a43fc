//! Command handlers - business logic for processing UI events

use uuid::Uuid;

use crate::app::AppState;
use crate::curl;
use crate::error::{ListError, StoreError};
use crate::messages::RowList;
use crate::models::{Environment, HttpMethod, KeyValueList, RequestDescriptor};

impl AppState {
    // ========================
    // Descriptor edits
    // ========================

    pub fn set_url(&mut self, url: String) {
        self.request.url = url;
    }

    pub fn set_method(&mut self, method: HttpMethod) {
        self.request.method = method;
    }

    pub fn cycle_method(&mut self) {
        self.request.method = self.request.method.next();
    }

    fn rows_mut(&mut self, list: RowList) -> &mut KeyValueList {
        match list {
            RowList::Headers => &mut self.request.headers,
            RowList::Body => &mut self.request.body,
        }
    }

    pub fn append_row(&mut self, list: RowList) -> Uuid {
        self.rows_mut(list).append()
    }

    pub fn update_row(
        &mut self,
        list: RowList,
        index: usize,
        key: String,
        value: String,
    ) -> Result<(), ListError> {
        self.rows_mut(list).update(index, key, value)
    }

    pub fn remove_row(&mut self, list: RowList, index: usize) -> Result<(), ListError> {
        self.rows_mut(list).remove_at(index).map(|_| ())
    }

    pub fn clear_rows(&mut self, list: RowList) {
        self.rows_mut(list).clear();
    }

    pub fn set_raw_body(&mut self, raw: String) {
        self.request.raw_body = raw;
    }

    pub fn set_use_raw_body(&mut self, use_raw: bool) {
        self.request.use_raw_body = use_raw;
    }

    /// Replaces the editor contents with a fresh descriptor, pre-filled from
    /// the current environment when one is selected
    pub fn new_request(&mut self) {
        self.request = match self.store.current_environment() {
            Some(env) => RequestDescriptor::from_environment(env),
            None => RequestDescriptor::default(),
        };
    }

    // ========================
    // Environments
    // ========================

    pub fn add_environment(&mut self, environment: Environment) -> Uuid {
        self.store.add_environment(environment)
    }

    pub fn switch_environment(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.store.switch_environment(id)
    }

    pub fn remove_environment(&mut self, id: Uuid) -> Result<(), StoreError> {
        self.store.remove_environment(id).map(|_| ())
    }

    pub fn clear_environment(&mut self) {
        self.store.clear_environment();
    }

    // ========================
    // History & favorites
    // ========================

    /// Copies a history record into the editor under a new identity
    pub fn load_history(&mut self, record_id: Uuid) -> Result<(), StoreError> {
        let record = self
            .store
            .history_record(record_id)
            .ok_or(StoreError::RecordNotFound(record_id))?;
        self.request = RequestDescriptor {
            id: Uuid::new_v4(),
            ..record.request.clone()
        };
        Ok(())
    }

    pub fn load_favorite(&mut self, record_id: Uuid) -> Result<(), StoreError> {
        let record = self
            .store
            .favorites()
            .iter()
            .find(|r| r.id == record_id)
            .ok_or(StoreError::RecordNotFound(record_id))?;
        self.request = RequestDescriptor {
            id: Uuid::new_v4(),
            ..record.request.clone()
        };
        Ok(())
    }

    pub fn promote_favorite(&mut self, record_id: Uuid, group: Option<String>) -> Result<(), StoreError> {
        self.store.promote_favorite_in_group(record_id, group)
    }

    pub fn demote_favorite(&mut self, record_id: Uuid) {
        self.store.demote_favorite(record_id);
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
    }

    // ========================
    // cURL import/export
    // ========================

    pub fn import_curl(&mut self, command: &str) -> anyhow::Result<()> {
        self.request = curl::parse_curl(command)?;
        Ok(())
    }

    pub fn export_curl(&mut self) {
        self.curl_export = Some(curl::to_curl(&self.request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OrderingPolicy;
    use crate::storage::Store;

    fn state() -> AppState {
        AppState::new(Store::in_memory(), OrderingPolicy::CompletionOrder)
    }

    #[test]
    fn test_row_edits() {
        let mut state = state();
        state.append_row(RowList::Headers);
        state
            .update_row(RowList::Headers, 0, String::from("Accept"), String::from("*/*"))
            .unwrap();
        assert_eq!(state.request.header("accept"), Some("*/*"));

        assert_eq!(
            state.remove_row(RowList::Body, 0),
            Err(ListError::IndexOutOfBounds { index: 0, len: 0 })
        );

        state.clear_rows(RowList::Headers);
        assert_eq!(state.request.headers.len(), 1);
        assert_eq!(state.request.header("accept"), None);
    }

    #[test]
    fn test_new_request_uses_current_environment() {
        let mut state = state();
        state.new_request();
        assert_eq!(state.request.url, "");

        let env = state.add_environment(Environment::new("Local", "http://localhost:8080").with_token("abc"));
        state.switch_environment(env).unwrap();
        state.new_request();
        assert_eq!(state.request.url, "http://localhost:8080");
        assert_eq!(state.request.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_switch_environment_leaves_descriptor_alone() {
        let mut state = state();
        state.set_url(String::from("https://example.test/keep"));
        let env = state.add_environment(Environment::new("Local", "http://localhost:8080"));
        state.switch_environment(env).unwrap();
        assert_eq!(state.request.url, "https://example.test/keep");
    }

    #[test]
    fn test_load_history_copies_with_new_identity() {
        let mut state = state();
        state.set_url(String::from("https://example.test/a"));
        let record_id = state.store.record_history(&state.request.clone());

        state.new_request();
        state.load_history(record_id).unwrap();
        assert_eq!(state.request.url, "https://example.test/a");
        assert_ne!(state.request.id, state.store.history()[0].request.id);

        state.set_url(String::from("https://example.test/edited"));
        assert_eq!(state.store.history()[0].request.url, "https://example.test/a");

        assert!(state.load_history(Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_curl_import_and_export() {
        let mut state = state();
        state.import_curl("curl -X DELETE https://example.test/items/1").unwrap();
        assert_eq!(state.request.method, HttpMethod::DELETE);

        state.export_curl();
        assert_eq!(
            state.curl_export.as_deref(),
            Some("curl \\\n  -X DELETE \\\n  'https://example.test/items/1'")
        );

        assert!(state.import_curl("curl -X").is_err());
        assert_eq!(state.request.method, HttpMethod::DELETE);
    }
}
