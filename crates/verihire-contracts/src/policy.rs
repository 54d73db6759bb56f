//! Policy-check results folded into the audit trail.
//!
//! The checks are computed by the evaluation logic and handed to the audit
//! log as one map.  At root-computation time the whole map becomes a single
//! trailing leaf after every log entry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the check asserting scoring inputs carry no protected attributes.
pub const BIAS_CHECK: &str = "bias_check";
/// Name of the check asserting PII was removed before scoring.
pub const DATA_SANITIZATION: &str = "data_sanitization";
/// Name of the check asserting the score breakdown is internally consistent.
pub const SCORING_INTEGRITY: &str = "scoring_integrity";

/// Outcome of one named policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Fail,
}

impl CheckStatus {
    pub fn from_bool(passed: bool) -> Self {
        if passed {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Fail => "fail",
        }
    }
}

/// Mapping from check name to pass/fail.
///
/// Backed by a `BTreeMap`, so iteration is always in check-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyCheckResult(BTreeMap<String, CheckStatus>);

impl PolicyCheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three standard checks produced for every evaluation.
    pub fn standard(bias: CheckStatus, sanitization: CheckStatus, integrity: CheckStatus) -> Self {
        let mut checks = Self::new();
        checks.set(BIAS_CHECK, bias);
        checks.set(DATA_SANITIZATION, sanitization);
        checks.set(SCORING_INTEGRITY, integrity);
        checks
    }

    pub fn set(&mut self, name: impl Into<String>, status: CheckStatus) {
        self.0.insert(name.into(), status);
    }

    pub fn get(&self, name: &str) -> Option<CheckStatus> {
        self.0.get(name).copied()
    }

    /// True when every recorded check passed.  An empty map passes.
    pub fn all_pass(&self) -> bool {
        self.0.values().all(|s| *s == CheckStatus::Pass)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CheckStatus)> {
        self.0.iter().map(|(name, status)| (name.as_str(), *status))
    }

    /// The JSON value this map contributes as the trailing Merkle leaf.
    pub fn to_leaf(&self) -> Value {
        let map: Map<String, Value> = self
            .0
            .iter()
            .map(|(name, status)| (name.clone(), Value::String(status.as_str().to_string())))
            .collect();
        Value::Object(map)
    }
}
