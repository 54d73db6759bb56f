//! Sealing and verifying audit snapshots.
//!
//! `seal` is the only place a snapshot's root and signature are produced;
//! `verify_snapshot` is what any downstream consumer runs to detect tampering.

use serde::Serialize;

use verihire_contracts::{
    error::HireResult, evaluation::EvaluationRecord, log::LogEntry, policy::PolicyCheckResult,
    snapshot::AuditSnapshot,
};

use crate::{merkle::merkle_root_hex, signer};

/// Build a complete snapshot: root over `logs ++ [policy_checks]`, signed.
pub fn seal(
    key: &[u8],
    logs: Vec<LogEntry>,
    policy_checks: PolicyCheckResult,
    last_evaluation: Option<EvaluationRecord>,
) -> HireResult<AuditSnapshot> {
    let mut snapshot = AuditSnapshot {
        logs,
        policy_checks,
        merkle_root: String::new(),
        signature: String::new(),
        last_evaluation,
    };
    snapshot.merkle_root = merkle_root_hex(&snapshot.leaves());
    snapshot.signature = signer::sign(key, &snapshot.merkle_root)?;
    Ok(snapshot)
}

/// Result of checking a snapshot against its own contents and a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotVerification {
    /// Root recomputed from the snapshot's logs and policy checks.
    pub recomputed_root: String,
    /// The stored root equals the recomputed one.
    pub root_matches: bool,
    /// The stored signature is valid for the stored root under the key.
    pub signature_valid: bool,
}

impl SnapshotVerification {
    /// True only when the contents, the root, and the signature all agree.
    pub fn is_trusted(&self) -> bool {
        self.root_matches && self.signature_valid
    }
}

/// Recompute the root of `snapshot` and check its signature under `key`.
pub fn verify_snapshot(key: &[u8], snapshot: &AuditSnapshot) -> SnapshotVerification {
    let recomputed_root = merkle_root_hex(&snapshot.leaves());
    SnapshotVerification {
        root_matches: recomputed_root == snapshot.merkle_root,
        signature_valid: signer::verify(key, &snapshot.merkle_root, &snapshot.signature),
        recomputed_root,
    }
}
