use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ListError;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    #[default]
    GET,
    POST,
    PUT,
    PATCH,
    DELETE,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::GET,
        HttpMethod::POST,
        HttpMethod::PUT,
        HttpMethod::PATCH,
        HttpMethod::DELETE,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::DELETE => "DELETE",
        }
    }

    pub fn next(&self) -> HttpMethod {
        match self {
            HttpMethod::GET => HttpMethod::POST,
            HttpMethod::POST => HttpMethod::PUT,
            HttpMethod::PUT => HttpMethod::PATCH,
            HttpMethod::PATCH => HttpMethod::DELETE,
            HttpMethod::DELETE => HttpMethod::GET,
        }
    }

    /// GET never carries a body, whatever the descriptor holds
    pub fn has_body(&self) -> bool {
        !matches!(self, HttpMethod::GET)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown HTTP method: {}", s))
    }
}

/// One editable key/value row with a stable identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    pub id: Uuid,
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            id: Uuid::new_v4(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Empty "draft" row
    pub fn draft() -> Self {
        Self::new("", "")
    }
}

/// Ordered key/value rows addressed by identity or by position.
///
/// Rows live in an id-keyed arena; `order` only records display position, so
/// removing a row never changes another row's identity. Rows with an empty
/// key are drafts: kept for editing, skipped by [`KeyValueList::non_empty`]
/// and dropped when serialized.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "Vec<KeyValue>", into = "Vec<KeyValue>")]
pub struct KeyValueList {
    entries: HashMap<Uuid, KeyValue>,
    order: Vec<Uuid>,
}

impl KeyValueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty draft row and returns its identity
    pub fn append(&mut self) -> Uuid {
        self.insert(KeyValue::draft())
    }

    /// Adds a populated row and returns its identity
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) -> Uuid {
        self.insert(KeyValue::new(key, value))
    }

    fn insert(&mut self, entry: KeyValue) -> Uuid {
        let id = entry.id;
        if self.entries.insert(id, entry).is_none() {
            self.order.push(id);
        }
        id
    }

    pub fn remove_at(&mut self, index: usize) -> Result<KeyValue, ListError> {
        let id = *self.id_at(index)?;
        self.order.remove(index);
        self.entries
            .remove(&id)
            .ok_or(ListError::IndexOutOfBounds { index, len: self.order.len() })
    }

    pub fn update(
        &mut self,
        index: usize,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ListError> {
        let len = self.order.len();
        let id = *self.id_at(index)?;
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(ListError::IndexOutOfBounds { index, len })?;
        entry.key = key.into();
        entry.value = value.into();
        Ok(())
    }

    /// Removes a row by identity; `None` if no such row
    pub fn remove(&mut self, id: Uuid) -> Option<KeyValue> {
        let entry = self.entries.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(entry)
    }

    /// Updates a row by identity; returns false if no such row
    pub fn update_by_id(
        &mut self,
        id: Uuid,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.key = key.into();
                entry.value = value.into();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: Uuid) -> Option<&KeyValue> {
        self.entries.get(&id)
    }

    pub fn position(&self, id: Uuid) -> Option<usize> {
        self.order.iter().position(|other| *other == id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All rows in display order, drafts included
    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Rows with a non-empty key, in order
    pub fn non_empty(&self) -> impl Iterator<Item = &KeyValue> + '_ {
        self.iter().filter(|kv| !kv.key.is_empty())
    }

    /// Folds the non-empty rows into a map; later duplicates win
    pub fn to_object(&self) -> BTreeMap<String, String> {
        self.non_empty()
            .map(|kv| (kv.key.clone(), kv.value.clone()))
            .collect()
    }

    /// Resets to a single draft row
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.append();
    }

    fn id_at(&self, index: usize) -> Result<&Uuid, ListError> {
        self.order.get(index).ok_or(ListError::IndexOutOfBounds {
            index,
            len: self.order.len(),
        })
    }
}

impl PartialEq for KeyValueList {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for KeyValueList {}

impl From<Vec<KeyValue>> for KeyValueList {
    fn from(rows: Vec<KeyValue>) -> Self {
        let mut list = KeyValueList::new();
        for row in rows {
            list.insert(row);
        }
        list
    }
}

impl From<KeyValueList> for Vec<KeyValue> {
    fn from(list: KeyValueList) -> Self {
        list.non_empty().cloned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueList {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut list = KeyValueList::new();
        for (key, value) in iter {
            list.push(key, value);
        }
        list
    }
}

/// An editable HTTP request: what the user composes before sending.
///
/// Exactly one body representation is active per send: `raw_body` when
/// `use_raw_body` is set, otherwise the non-empty `body` rows as a JSON object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub id: Uuid,
    pub url: String,
    pub method: HttpMethod,
    pub headers: KeyValueList,
    pub body: KeyValueList,
    pub raw_body: String,
    pub use_raw_body: bool,
}

impl Default for RequestDescriptor {
    fn default() -> Self {
        RequestDescriptor {
            id: Uuid::new_v4(),
            url: String::new(),
            method: HttpMethod::GET,
            headers: KeyValueList::new(),
            body: KeyValueList::new(),
            raw_body: String::new(),
            use_raw_body: false,
        }
    }
}

impl RequestDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// New descriptor pre-filled from an environment's base URL and token
    pub fn from_environment(environment: &Environment) -> Self {
        let mut descriptor = RequestDescriptor {
            url: environment.base_url.clone(),
            ..Self::default()
        };
        if let Some(token) = environment.token.as_deref().filter(|t| !t.is_empty()) {
            descriptor
                .headers
                .push("Authorization", format!("Bearer {}", token));
        }
        descriptor
    }

    /// Value of the last non-empty header row named `name` (case-insensitive)
    /// Copy with draft rows dropped from both lists
    pub fn snapshot(&self) -> RequestDescriptor {
        RequestDescriptor {
            headers: KeyValueList::from(self.headers.non_empty().cloned().collect::<Vec<_>>()),
            body: KeyValueList::from(self.body.non_empty().cloned().collect::<Vec<_>>()),
            ..self.clone()
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .non_empty()
            .filter(|kv| kv.key.trim().eq_ignore_ascii_case(name.trim()))
            .last()
            .map(|kv| kv.value.as_str())
    }
}

/// Named base-URL/credential profile
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl Environment {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Environment {
            id: Uuid::new_v4(),
            name: name.into(),
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Snapshot of a descriptor at the moment it was sent
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: Uuid,
    pub request: RequestDescriptor,
    pub timestamp: DateTime<Utc>,
    pub is_favorite: bool,
    #[serde(default)]
    pub group_name: Option<String>,
}

impl HistoryRecord {
    pub fn new(request: RequestDescriptor) -> Self {
        HistoryRecord {
            id: Uuid::new_v4(),
            request,
            timestamp: Utc::now(),
            is_favorite: false,
            group_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(rows: &[(&str, &str)]) -> KeyValueList {
        rows.iter().copied().collect()
    }

    #[test]
    fn test_append_creates_draft_with_fresh_id() {
        let mut rows = KeyValueList::new();
        let a = rows.append();
        let b = rows.append();
        assert_ne!(a, b);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.non_empty().count(), 0);
    }

    #[test]
    fn test_remove_at_out_of_bounds() {
        let mut rows = list(&[("a", "1")]);
        assert_eq!(
            rows.remove_at(1),
            Err(ListError::IndexOutOfBounds { index: 1, len: 1 })
        );
        assert_eq!(
            KeyValueList::new().remove_at(0),
            Err(ListError::IndexOutOfBounds { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_update_out_of_bounds() {
        let mut rows = KeyValueList::new();
        assert!(rows.update(0, "k", "v").is_err());
    }

    #[test]
    fn test_removal_keeps_other_identities() {
        let mut rows = list(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let ids: Vec<Uuid> = rows.iter().map(|kv| kv.id).collect();

        let removed = rows.remove_at(1).unwrap();
        assert_eq!(removed.key, "b");
        assert_eq!(rows.position(ids[0]), Some(0));
        assert_eq!(rows.position(ids[2]), Some(1));
        assert_eq!(rows.get(ids[2]).unwrap().key, "c");
    }

    #[test]
    fn test_update_by_index_and_id() {
        let mut rows = KeyValueList::new();
        let id = rows.append();
        rows.update(0, "Accept", "text/plain").unwrap();
        assert_eq!(rows.get(id).unwrap().value, "text/plain");

        assert!(rows.update_by_id(id, "Accept", "application/json"));
        assert_eq!(rows.get(id).unwrap().value, "application/json");
        assert!(!rows.update_by_id(Uuid::new_v4(), "x", "y"));
        assert!(rows.remove(id).is_some());
        assert!(rows.is_empty());
    }

    #[test]
    fn test_to_object_last_duplicate_wins() {
        let rows = list(&[("a", "1"), ("b", "2"), ("a", "3")]);
        let object = rows.to_object();
        assert_eq!(object.len(), 2);
        assert_eq!(object["a"], "3");
    }

    #[test]
    fn test_all_empty_keys_yield_empty_object() {
        let mut rows = KeyValueList::new();
        rows.append();
        rows.push("", "orphan value");
        assert!(rows.to_object().is_empty());
    }

    #[test]
    fn test_clear_leaves_single_draft() {
        let mut rows = list(&[("a", "1"), ("b", "2")]);
        rows.clear();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.iter().next().unwrap().key, "");
    }

    #[test]
    fn test_serialization_drops_drafts() {
        let mut rows = list(&[("a", "1")]);
        let populated = rows.clone();
        rows.append();

        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 1);

        let back: KeyValueList = serde_json::from_value(json).unwrap();
        assert_eq!(back, populated);
    }

    #[test]
    fn test_method_parsing_and_body_rule() {
        assert_eq!("patch".parse::<HttpMethod>(), Ok(HttpMethod::PATCH));
        assert!("TRACE".parse::<HttpMethod>().is_err());
        assert!(!HttpMethod::GET.has_body());
        assert!(HttpMethod::DELETE.has_body());
        assert_eq!(HttpMethod::DELETE.next(), HttpMethod::GET);
    }

    #[test]
    fn test_descriptor_from_environment() {
        let env = Environment::new("Local", "http://localhost:8080").with_token("abc");
        let descriptor = RequestDescriptor::from_environment(&env);
        assert_eq!(descriptor.url, "http://localhost:8080");
        assert_eq!(descriptor.header("authorization"), Some("Bearer abc"));

        let bare = RequestDescriptor::from_environment(&Environment::new("Bare", "http://x"));
        assert!(bare.headers.is_empty());
    }

    #[test]
    fn test_header_lookup_ignores_padding() {
        let mut descriptor = RequestDescriptor::new();
        descriptor.headers.push(" Content-Type ", "text/plain");
        assert_eq!(descriptor.header("content-type"), Some("text/plain"));
    }

    #[test]
    fn test_snapshot_drops_drafts() {
        let mut descriptor = RequestDescriptor::new();
        descriptor.headers.push("Accept", "*/*");
        descriptor.headers.append();
        descriptor.body.append();
        let snapshot = descriptor.snapshot();
        assert_eq!(snapshot.headers.len(), 1);
        assert!(snapshot.body.is_empty());
        assert_eq!(snapshot.id, descriptor.id);
    }

    #[test]
    fn test_environment_field_names() {
        let env = Environment::new("Prod", "https://api.example.test");
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["baseURL"], "https://api.example.test");
    }
}
