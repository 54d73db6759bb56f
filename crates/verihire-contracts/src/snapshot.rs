//! The persisted audit snapshot ("agent facts").

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{evaluation::EvaluationRecord, log::LogEntry, policy::PolicyCheckResult};

/// Full persisted audit state, rewritten in its entirety on every append.
///
/// `merkle_root` commits to `logs ++ [policy_checks]`; `signature` is the
/// HMAC-SHA256 of the hex root under the deployment's signing key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditSnapshot {
    #[serde(default)]
    pub logs: Vec<LogEntry>,

    #[serde(default)]
    pub policy_checks: PolicyCheckResult,

    /// 64-char lowercase hex.
    #[serde(default)]
    pub merkle_root: String,

    /// 64-char lowercase hex.
    #[serde(default)]
    pub signature: String,

    #[serde(default)]
    pub last_evaluation: Option<EvaluationRecord>,
}

impl AuditSnapshot {
    /// The ordered leaf values the Merkle root commits to.
    ///
    /// Every log entry in append order, then the policy-check map as one
    /// trailing leaf.
    pub fn leaves(&self) -> Vec<Value> {
        let mut leaves: Vec<Value> = self.logs.iter().map(|e| e.to_leaf()).collect();
        leaves.push(self.policy_checks.to_leaf());
        leaves
    }
}
