//! In-memory implementation of `AuditSink`.
//!
//! `InMemoryAuditSink` seals snapshots exactly like `AuditLogStore` but keeps
//! them in a `Mutex` instead of on disk.  It backs dry runs and tests that
//! need real roots and signatures without touching the filesystem.

use std::sync::{Arc, Mutex, MutexGuard};

use rand::{rngs::OsRng, RngCore};
use serde_json::{Map, Value};
use tracing::debug;

use verihire_contracts::{
    error::{HireError, HireResult},
    evaluation::EvaluationRecord,
    log::{Action, LogEntry},
    policy::PolicyCheckResult,
    snapshot::AuditSnapshot,
};
use verihire_core::traits::AuditSink;

use crate::{
    keystore::KEY_LEN,
    verify::{seal, verify_snapshot},
};

#[derive(Default)]
pub(crate) struct InMemoryState {
    pub(crate) snapshot: Option<AuditSnapshot>,
    pub(crate) history: Vec<EvaluationRecord>,
}

/// An audit sink that never leaves the process.
pub struct InMemoryAuditSink {
    key: Vec<u8>,
    pub(crate) state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryAuditSink {
    /// A sink signing with `key`.
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            state: Arc::new(Mutex::new(InMemoryState::default())),
        }
    }

    /// A sink with a fresh random key that dies with the process.
    pub fn ephemeral() -> Self {
        let mut key = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self::new(key)
    }

    fn lock(&self) -> HireResult<MutexGuard<'_, InMemoryState>> {
        self.state.lock().map_err(|e| HireError::LockFailed {
            reason: format!("audit state lock poisoned: {}", e),
        })
    }

    /// Evaluation records appended so far, oldest first.
    pub fn history(&self) -> HireResult<Vec<EvaluationRecord>> {
        Ok(self.lock()?.history.clone())
    }

    /// True if the current snapshot (or the absence of one) checks out.
    pub fn verify_integrity(&self) -> HireResult<bool> {
        let state = self.lock()?;
        Ok(state
            .snapshot
            .as_ref()
            .map_or(true, |snapshot| verify_snapshot(&self.key, snapshot).is_trusted()))
    }

    fn push(
        &self,
        state: &mut InMemoryState,
        entry: LogEntry,
        policy_checks: &PolicyCheckResult,
        last_evaluation: Option<EvaluationRecord>,
    ) -> HireResult<AuditSnapshot> {
        let previous = state.snapshot.take().unwrap_or_default();
        let mut logs = previous.logs;
        logs.push(entry);
        let last_evaluation = last_evaluation.or(previous.last_evaluation);

        let snapshot = seal(&self.key, logs, policy_checks.clone(), last_evaluation)?;
        debug!(entries = snapshot.logs.len(), merkle_root = %snapshot.merkle_root, "in-memory snapshot sealed");
        state.snapshot = Some(snapshot.clone());
        Ok(snapshot)
    }
}

impl AuditSink for InMemoryAuditSink {
    fn append(
        &self,
        action: Action,
        details: Map<String, Value>,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot> {
        let mut state = self.lock()?;
        self.push(&mut state, LogEntry::now(action, details), policy_checks, None)
    }

    fn record_evaluation(
        &self,
        record: &EvaluationRecord,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot> {
        let mut state = self.lock()?;
        let entry = LogEntry::now(Action::Evaluate, crate::store::evaluate_details(record));
        let snapshot = self.push(&mut state, entry, policy_checks, Some(record.clone()))?;
        state.history.push(record.clone());
        Ok(snapshot)
    }

    fn snapshot(&self) -> HireResult<Option<AuditSnapshot>> {
        Ok(self.lock()?.snapshot.clone())
    }
}
