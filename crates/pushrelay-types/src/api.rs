use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Mode;

// -- Requests --

/// Body posted by the `messages` insert trigger.
#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    pub record: Option<EventRecord>,
}

/// A chat message row as the trigger sees it. Every field is optional on the
/// wire; the router decides what is missing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct EventRecord {
    pub conversation_id: Option<String>,
    pub sender_id: Option<String>,
    pub receiver_id: Option<String>,
    pub content: Option<String>,
    /// support | reservation | property
    pub kind: Option<String>,
}

/// Body posted by a caller that already knows the device addresses.
/// `tokens` and `data` are loosely typed on the wire; use
/// [`ManualRequest::device_tokens`] and [`ManualRequest::data_strings`].
#[derive(Debug, Default, Deserialize)]
pub struct ManualRequest {
    pub tokens: Option<Vec<Value>>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub data: Option<BTreeMap<String, Value>>,
}

impl ManualRequest {
    /// Scalar entries as trimmed strings. Null, blank and structured entries are dropped.
    pub fn device_tokens(&self) -> Vec<String> {
        self.tokens
            .iter()
            .flatten()
            .filter_map(scalar_to_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// FCM data values must be strings: scalars are stringified, null becomes
    /// empty, arrays and objects are sent as JSON text.
    pub fn data_strings(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .flatten()
            .map(|(k, v)| {
                let v = scalar_to_string(v).unwrap_or_else(|| match v {
                    Value::Null => String::new(),
                    other => other.to_string(),
                });
                (k.clone(), v)
            })
            .collect()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// -- Responses --

/// Outcome of a single send to one device address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchResult {
    pub ok: bool,
    /// Upstream HTTP status, or 0 when the request never got a response.
    pub status: u16,
    pub body: Value,
}

#[derive(Debug, Serialize)]
pub struct PushResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    pub sent: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<DispatchResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl PushResponse {
    /// Nothing was sent, and that is not an error.
    pub fn skipped(mode: Option<Mode>, reason: &str) -> Self {
        Self {
            ok: true,
            mode,
            sent: 0,
            results: None,
            reason: Some(reason.to_string()),
        }
    }

    pub fn delivered(mode: Mode, results: Vec<DispatchResult>) -> Self {
        Self {
            ok: true,
            mode: Some(mode),
            sent: results.len(),
            results: Some(results),
            reason: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, stack: Option<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
            stack,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manual(body: Value) -> ManualRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn device_tokens_stringify_scalars_and_drop_the_rest() {
        let req = manual(json!({
            "tokens": [" dev-x ", 5, true, null, "", "  ", { "t": 1 }, ["y"]]
        }));
        assert_eq!(req.device_tokens(), vec!["dev-x", "5", "true"]);
    }

    #[test]
    fn missing_tokens_are_empty() {
        assert!(manual(json!({})).device_tokens().is_empty());
    }

    #[test]
    fn data_values_become_strings() {
        let req = manual(json!({
            "data": { "kind": "support", "n": 1, "flag": false, "none": null, "nested": { "a": 1 } }
        }));
        let data = req.data_strings();
        assert_eq!(data["kind"], "support");
        assert_eq!(data["n"], "1");
        assert_eq!(data["flag"], "false");
        assert_eq!(data["none"], "");
        assert_eq!(data["nested"], r#"{"a":1}"#);
    }
}
