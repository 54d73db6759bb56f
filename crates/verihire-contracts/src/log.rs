//! Audit log entry types.
//!
//! A `LogEntry` is one immutable line of the append-only audit log.  Its
//! position in the log is part of the Merkle commitment, so entries are never
//! reordered, edited, or removed once appended.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of event a log entry records.
///
/// Serialized as a bare string so entries written by any producer, including
/// tags this enum does not know about, round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Action {
    Evaluate,
    PolicyCheck,
    ScoreCalculated,
    Decide,
    HistoryUpdated,
    /// Any tag outside the well-known set.
    Other(String),
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Evaluate => "evaluate",
            Action::PolicyCheck => "policy_check",
            Action::ScoreCalculated => "score_calculated",
            Action::Decide => "decide",
            Action::HistoryUpdated => "history_updated",
            Action::Other(tag) => tag,
        }
    }
}

impl From<String> for Action {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "evaluate" => Action::Evaluate,
            "policy_check" => Action::PolicyCheck,
            "score_calculated" => Action::ScoreCalculated,
            "decide" => Action::Decide,
            "history_updated" => Action::HistoryUpdated,
            _ => Action::Other(tag),
        }
    }
}

impl From<&str> for Action {
    fn from(tag: &str) -> Self {
        Action::from(tag.to_string())
    }
}

impl From<Action> for String {
    fn from(action: Action) -> Self {
        match action {
            Action::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single action record in the audit log.
///
/// The timestamp is kept as the exact string that was hashed.  Re-rendering
/// it from a parsed `DateTime` could change its bytes and break the root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 UTC timestamp with a `Z` suffix.
    #[serde(rename = "ts", alias = "timestamp")]
    pub timestamp: String,

    pub action: Action,

    /// Free-form structured payload; any JSON value is allowed per key.
    #[serde(default)]
    pub details: Map<String, Value>,
}

impl LogEntry {
    /// Build an entry stamped with the current UTC time.
    pub fn now(action: impl Into<Action>, details: Map<String, Value>) -> Self {
        Self {
            timestamp: iso_timestamp(Utc::now()),
            action: action.into(),
            details,
        }
    }

    /// The JSON value this entry contributes as a Merkle leaf.
    pub fn to_leaf(&self) -> Value {
        let mut leaf = Map::new();
        leaf.insert("ts".to_string(), Value::String(self.timestamp.clone()));
        leaf.insert(
            "action".to_string(),
            Value::String(self.action.as_str().to_string()),
        );
        leaf.insert("details".to_string(), Value::Object(self.details.clone()));
        Value::Object(leaf)
    }
}

/// Render `at` as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}
