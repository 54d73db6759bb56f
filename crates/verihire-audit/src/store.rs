//! File-backed audit log.
//!
//! `AuditLogStore` owns four files under one data directory:
//!
//! | file              | contents                                   |
//! |-------------------|--------------------------------------------|
//! | `history.json`    | every `EvaluationRecord`, oldest first     |
//! | `agentfacts.json` | the current signed `AuditSnapshot`         |
//! | `secret.key`      | 32 raw signing-key bytes                   |
//! | `audit.lock`      | empty; carries the advisory append lock    |
//!
//! Every append is one read-modify-write under both an in-process mutex and
//! an exclusive file lock.  Files are replaced by atomic rename, so no reader
//! ever observes a partially written snapshot.

use std::fs::File;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use verihire_contracts::{
    config::StorageConfig,
    error::{HireError, HireResult},
    evaluation::EvaluationRecord,
    log::{Action, LogEntry},
    policy::PolicyCheckResult,
    snapshot::AuditSnapshot,
};
use verihire_core::traits::AuditSink;

use crate::{
    fsutil::{lock_exclusive, quarantine, read_json, restore_raw, write_json_atomic, Loaded},
    keystore,
    merkle::merkle_root_hex,
    verify::{seal, verify_snapshot, SnapshotVerification},
};

/// Holds the append lock for as long as it lives.
struct AppendGuard<'a> {
    _local: MutexGuard<'a, ()>,
    file: File,
}

impl Drop for AppendGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            warn!(error = %err, "failed to release audit file lock");
        }
    }
}

/// The persistent, append-only audit log and evaluation history.
pub struct AuditLogStore {
    storage: StorageConfig,
    local: Mutex<()>,
}

impl AuditLogStore {
    /// Open a store rooted at `storage.data_dir`, creating the directory.
    ///
    /// Nothing else is created until the first append.
    pub fn open(storage: StorageConfig) -> HireResult<Self> {
        std::fs::create_dir_all(&storage.data_dir).map_err(|e| HireError::StorageWrite {
            path: storage.data_dir.display().to_string(),
            reason: format!("failed to create data directory: {}", e),
        })?;
        debug!(data_dir = %storage.data_dir.display(), "audit store opened");
        Ok(Self {
            storage,
            local: Mutex::new(()),
        })
    }

    pub fn storage(&self) -> &StorageConfig {
        &self.storage
    }

    /// All evaluation records, oldest first.
    ///
    /// A missing file is an empty history.  A corrupt file is logged and also
    /// read as empty; it is left in place for inspection.
    pub fn load_history(&self) -> Vec<EvaluationRecord> {
        read_or_default(&self.storage.history_path()).unwrap_or_default()
    }

    /// The current snapshot, or `None` if nothing has been appended yet or
    /// the snapshot file is corrupt (logged).
    pub fn load_snapshot(&self) -> Option<AuditSnapshot> {
        read_or_default(&self.storage.snapshot_path())
    }

    /// The signing key, generated on first use.
    pub fn signing_key(&self) -> HireResult<Vec<u8>> {
        keystore::get_or_create_key(&self.storage.key_path())
    }

    /// Verify the persisted snapshot against the persisted key.
    ///
    /// Returns `Ok(None)` when there is no snapshot.  Never generates a key:
    /// without one the signature is reported invalid.  A corrupt snapshot
    /// file is returned as `StorageRead`, since it cannot be trusted.
    pub fn verify_current(&self) -> HireResult<Option<SnapshotVerification>> {
        let snapshot = match read_json::<AuditSnapshot>(&self.storage.snapshot_path()) {
            Loaded::Absent => return Ok(None),
            Loaded::Parsed { value, .. } => value,
            Loaded::Corrupt(err) => return Err(err),
        };
        let key = keystore::read_key(&self.storage.key_path())?;
        let report = match key {
            Some(key) => verify_snapshot(&key, &snapshot),
            None => {
                warn!(path = %self.storage.key_path().display(), "no signing key; signature cannot be verified");
                let recomputed_root = merkle_root_hex(&snapshot.leaves());
                SnapshotVerification {
                    root_matches: recomputed_root == snapshot.merkle_root,
                    signature_valid: false,
                    recomputed_root,
                }
            }
        };
        if !report.is_trusted() {
            warn!(
                stored_root = %snapshot.merkle_root,
                recomputed_root = %report.recomputed_root,
                signature_valid = report.signature_valid,
                "audit snapshot failed verification"
            );
        }
        Ok(Some(report))
    }

    fn lock(&self) -> HireResult<AppendGuard<'_>> {
        let local = self.local.lock().map_err(|e| HireError::LockFailed {
            reason: format!("audit store mutex poisoned: {}", e),
        })?;
        let file = lock_exclusive(&self.storage.lock_path())?;
        Ok(AppendGuard { _local: local, file })
    }

    /// Load a file for modification.  Corrupt files are moved aside so the
    /// rewrite does not destroy them.
    fn load_for_update<T: DeserializeOwned + Default>(path: &Path) -> (T, Option<Vec<u8>>) {
        match read_json::<T>(path) {
            Loaded::Absent => (T::default(), None),
            Loaded::Parsed { value, raw } => (value, Some(raw)),
            Loaded::Corrupt(err) => {
                warn!(error = %err, "corrupt store file found during append");
                quarantine(path);
                (T::default(), None)
            }
        }
    }

    /// Append `entry` to the loaded snapshot, seal, and persist it.
    fn append_entry(
        &self,
        entry: LogEntry,
        policy_checks: &PolicyCheckResult,
        last_evaluation: Option<EvaluationRecord>,
    ) -> HireResult<AuditSnapshot> {
        let snapshot_path = self.storage.snapshot_path();
        let (previous, _) = Self::load_for_update::<AuditSnapshot>(&snapshot_path);

        let mut logs = previous.logs;
        logs.push(entry);
        let last_evaluation = last_evaluation.or(previous.last_evaluation);

        let key = self.signing_key()?;
        let snapshot = seal(&key, logs, policy_checks.clone(), last_evaluation)?;
        write_json_atomic(&snapshot_path, &snapshot)?;

        debug!(
            entries = snapshot.logs.len(),
            merkle_root = %snapshot.merkle_root,
            "audit snapshot persisted"
        );
        Ok(snapshot)
    }
}

impl AuditSink for AuditLogStore {
    fn append(
        &self,
        action: Action,
        details: Map<String, Value>,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot> {
        let _guard = self.lock()?;
        self.append_entry(LogEntry::now(action, details), policy_checks, None)
    }

    /// History first, then the snapshot.  If the snapshot cannot be written
    /// the history file is put back the way it was.
    fn record_evaluation(
        &self,
        record: &EvaluationRecord,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot> {
        let _guard = self.lock()?;

        let history_path = self.storage.history_path();
        let (mut history, previous_raw) =
            Self::load_for_update::<Vec<EvaluationRecord>>(&history_path);
        history.push(record.clone());
        write_json_atomic(&history_path, &history)?;

        let entry = LogEntry::now(Action::Evaluate, evaluate_details(record));
        match self.append_entry(entry, policy_checks, Some(record.clone())) {
            Ok(snapshot) => {
                info!(id = %record.id, history = history.len(), "evaluation persisted");
                Ok(snapshot)
            }
            Err(err) => {
                warn!(id = %record.id, error = %err, "snapshot write failed; restoring history");
                if let Err(restore_err) = restore_raw(&history_path, previous_raw.as_deref()) {
                    warn!(error = %restore_err, "failed to restore history after snapshot failure");
                }
                Err(err)
            }
        }
    }

    fn snapshot(&self) -> HireResult<Option<AuditSnapshot>> {
        Ok(self.load_snapshot())
    }
}

/// `{id, decision, score}` as logged for every evaluation.
pub(crate) fn evaluate_details(record: &EvaluationRecord) -> Map<String, Value> {
    let mut details = Map::new();
    details.insert("id".to_string(), Value::String(record.id.clone()));
    details.insert(
        "decision".to_string(),
        Value::String(record.decision.to_string()),
    );
    details.insert("score".to_string(), Value::from(record.total_score));
    details
}

fn read_or_default<T: DeserializeOwned>(path: &Path) -> Option<T> {
    match read_json::<T>(path) {
        Loaded::Absent => None,
        Loaded::Parsed { value, .. } => Some(value),
        Loaded::Corrupt(err) => {
            warn!(error = %err, "ignoring unreadable store file");
            None
        }
    }
}
