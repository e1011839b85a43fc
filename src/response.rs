//! Response outcomes and the view model that publishes the current one

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::OrderingPolicy;
use crate::constants::FAILURE_MARKER;

/// Response headers with case-insensitive lookup.
///
/// Names are stored lower-cased; repeated headers are joined with `", "`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        self.0
            .entry(name.to_ascii_lowercase())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for ResponseHeaders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = ResponseHeaders::new();
        for (name, value) in iter {
            headers.insert(name.as_ref(), value);
        }
        headers
    }
}

/// Terminal result of one send: a response or a failure reason, never both
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseOutcome {
    Success {
        status_code: u16,
        headers: ResponseHeaders,
        body: String,
        duration_ms: f64,
        size_bytes: usize,
    },
    Failure {
        message: String,
        /// Absent when the request never reached the network.
        duration_ms: Option<f64>,
    },
}

impl ResponseOutcome {
    pub fn failure(message: impl Into<String>, duration_ms: Option<f64>) -> Self {
        ResponseOutcome::Failure {
            message: message.into(),
            duration_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ResponseOutcome::Success { status_code, .. } => Some(*status_code),
            ResponseOutcome::Failure { .. } => None,
        }
    }

    pub fn duration_ms(&self) -> Option<f64> {
        match self {
            ResponseOutcome::Success { duration_ms, .. } => Some(*duration_ms),
            ResponseOutcome::Failure { duration_ms, .. } => *duration_ms,
        }
    }
}

/// Issue-order token handed out by [`ResponseView::begin_send`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SendTicket(u64);

impl SendTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Loading flag plus the current outcome.
///
/// A new send leaves the previous outcome visible until it resolves. With
/// [`OrderingPolicy::CompletionOrder`] every completion replaces `current`,
/// so an earlier send finishing late overwrites a newer result.
#[derive(Clone, Debug, Default)]
pub struct ResponseView {
    is_loading: bool,
    current: Option<ResponseOutcome>,
    policy: OrderingPolicy,
    issued: u64,
    applied: Option<SendTicket>,
}

impl ResponseView {
    pub fn new(policy: OrderingPolicy) -> Self {
        ResponseView {
            policy,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn current(&self) -> Option<&ResponseOutcome> {
        self.current.as_ref()
    }

    pub fn policy(&self) -> OrderingPolicy {
        self.policy
    }

    pub fn begin_send(&mut self) -> SendTicket {
        self.issued += 1;
        self.is_loading = true;
        SendTicket(self.issued)
    }

    /// Applies a resolved outcome; returns false if the policy dropped it
    pub fn complete_send(&mut self, ticket: SendTicket, outcome: ResponseOutcome) -> bool {
        self.is_loading = false;

        if self.policy == OrderingPolicy::LatestIssued
            && self.applied.is_some_and(|applied| ticket < applied)
        {
            tracing::debug!(ticket = ticket.0, "Dropping stale outcome");
            return false;
        }

        self.applied = Some(ticket);
        self.current = Some(outcome);
        true
    }

    /// Key-sorted, indented JSON when the body parses, raw body otherwise,
    /// marked message for failures, empty before the first outcome
    pub fn pretty_projection(&self) -> String {
        match &self.current {
            Some(ResponseOutcome::Success { body, .. }) => pretty_json(body).unwrap_or_else(|| body.clone()),
            Some(ResponseOutcome::Failure { message, .. }) => format!("{}{}", FAILURE_MARKER, message),
            None => String::new(),
        }
    }

    pub fn raw_projection(&self) -> String {
        match &self.current {
            Some(ResponseOutcome::Success { body, .. }) => body.clone(),
            Some(ResponseOutcome::Failure { message, .. }) => format!("{}{}", FAILURE_MARKER, message),
            None => String::new(),
        }
    }

    /// One-line summary: `"201 · 12.3 ms · 10 B"`
    pub fn status_line(&self) -> Option<String> {
        match self.current.as_ref()? {
            ResponseOutcome::Success {
                status_code,
                duration_ms,
                size_bytes,
                ..
            } => Some(format!("{} · {:.1} ms · {} B", status_code, duration_ms, size_bytes)),
            ResponseOutcome::Failure {
                duration_ms: Some(ms),
                ..
            } => Some(format!("failed · {:.1} ms", ms)),
            ResponseOutcome::Failure { .. } => Some(String::from("failed")),
        }
    }
}

fn pretty_json(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    serde_json::to_string_pretty(&sort_keys(value)).ok()
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(status: u16, body: &str) -> ResponseOutcome {
        ResponseOutcome::Success {
            status_code: status,
            headers: ResponseHeaders::new(),
            body: body.to_string(),
            duration_ms: 12.5,
            size_bytes: body.len(),
        }
    }

    #[test]
    fn test_headers_case_insensitive() {
        let headers: ResponseHeaders = [("Content-Type", "text/plain"), ("Set-Cookie", "a=1"), ("set-cookie", "b=2")]
            .into_iter()
            .collect();
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(headers.get("Set-Cookie"), Some("a=1, b=2"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_begin_send_keeps_stale_outcome() {
        let mut view = ResponseView::default();
        let first = view.begin_send();
        view.complete_send(first, success(200, "old"));

        view.begin_send();
        assert!(view.is_loading());
        assert_eq!(view.current(), Some(&success(200, "old")));
    }

    #[test]
    fn test_completion_order_wins_by_default() {
        let mut view = ResponseView::new(OrderingPolicy::CompletionOrder);
        let a = view.begin_send();
        let b = view.begin_send();

        assert!(view.complete_send(b, success(200, "b")));
        assert!(view.complete_send(a, success(200, "a")));
        assert_eq!(view.current(), Some(&success(200, "a")));
        assert!(!view.is_loading());
    }

    #[test]
    fn test_latest_issued_drops_stale() {
        let mut view = ResponseView::new(OrderingPolicy::LatestIssued);
        let a = view.begin_send();
        let b = view.begin_send();

        assert!(view.complete_send(b, success(200, "b")));
        assert!(!view.complete_send(a, success(200, "a")));
        assert_eq!(view.current(), Some(&success(200, "b")));
    }

    #[test]
    fn test_pretty_projection_sorts_and_indents() {
        let mut view = ResponseView::default();
        let ticket = view.begin_send();
        view.complete_send(ticket, success(200, r#"{"b":1,"a":{"d":true,"c":null}}"#));
        assert_eq!(
            view.pretty_projection(),
            "{\n  \"a\": {\n    \"c\": null,\n    \"d\": true\n  },\n  \"b\": 1\n}"
        );
    }

    #[test]
    fn test_pretty_projection_passes_non_json_through() {
        let mut view = ResponseView::default();
        assert_eq!(view.pretty_projection(), "");

        let ticket = view.begin_send();
        view.complete_send(ticket, success(200, "<html>hi</html>"));
        assert_eq!(view.pretty_projection(), "<html>hi</html>");
    }

    #[test]
    fn test_failure_projection_is_marked() {
        let mut view = ResponseView::default();
        let ticket = view.begin_send();
        view.complete_send(ticket, ResponseOutcome::failure("invalid URL", None));
        assert_eq!(view.pretty_projection(), "Error: invalid URL");
        assert_eq!(view.raw_projection(), "Error: invalid URL");
        assert_eq!(view.status_line().as_deref(), Some("failed"));
    }

    #[test]
    fn test_status_line() {
        let mut view = ResponseView::default();
        let ticket = view.begin_send();
        view.complete_send(ticket, success(201, "{\"ok\":true}"));
        assert_eq!(view.status_line().as_deref(), Some("201 · 12.5 ms · 11 B"));
    }
}
