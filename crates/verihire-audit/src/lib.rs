//! # verihire-audit
//!
//! Append-only, tamper-evident audit log for the verihire pipeline.
//!
//! ## Overview
//!
//! Every append recomputes a SHA-256 Merkle root over the whole log plus the
//! current policy-check map (one trailing leaf), signs the hex root with
//! HMAC-SHA256 under a persistent key, and atomically rewrites the snapshot.
//! Changing any logged byte changes the root; changing the root without the
//! key invalidates the signature.  `verify_snapshot` detects both.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use verihire_audit::AuditLogStore;
//! use verihire_contracts::config::StorageConfig;
//! use verihire_core::traits::AuditSink;
//!
//! let store = AuditLogStore::open(StorageConfig::in_dir("/var/lib/verihire"))?;
//! let snapshot = store.record_evaluation(&record, &policy_checks)?;
//! assert!(store.verify_current()?.unwrap().is_trusted());
//! ```

pub mod encode;
mod fsutil;
pub mod keystore;
pub mod memory;
pub mod merkle;
pub mod signer;
pub mod store;
pub mod verify;

pub use encode::encode_leaf;
pub use keystore::{get_or_create_key, read_key, KEY_LEN};
pub use memory::InMemoryAuditSink;
pub use merkle::{merkle_root, merkle_root_hex, next_layer, Digest, EMPTY_ROOT_HEX};
pub use signer::{sign, verify};
pub use store::AuditLogStore;
pub use verify::{seal, verify_snapshot, SnapshotVerification};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::{json, Map, Value};
    use tempfile::TempDir;

    use verihire_contracts::{
        config::StorageConfig,
        evaluation::{Decision, EvaluationRecord, ScoreBreakdown},
        log::{Action, LogEntry},
        policy::{CheckStatus, PolicyCheckResult},
        snapshot::AuditSnapshot,
    };
    use verihire_core::traits::AuditSink;

    use super::*;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn passing_checks() -> PolicyCheckResult {
        PolicyCheckResult::standard(CheckStatus::Pass, CheckStatus::Pass, CheckStatus::Pass)
    }

    fn details(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn make_record(id: &str, total: f64) -> EvaluationRecord {
        EvaluationRecord {
            id: id.to_string(),
            name: format!("candidate-{id}"),
            skills: vec!["python".to_string()],
            years_experience: 4.0,
            projects: 2,
            job_description: "python developer".to_string(),
            matched_skills: vec!["python".to_string()],
            missing_skills: vec![],
            extra_skills: vec![],
            skill_match_percent: 100.0,
            scores: ScoreBreakdown { skills: 60.0, experience: 20.0, projects: 10.0 },
            total_score: total,
            decision: if total >= 60.0 { Decision::Shortlist } else { Decision::Reject },
            strengths: vec![],
            reasoning: String::new(),
            timestamp: 1_700_000_000,
        }
    }

    fn open_store(dir: &TempDir) -> AuditLogStore {
        AuditLogStore::open(StorageConfig::in_dir(dir.path())).unwrap()
    }

    // ── Sealing ───────────────────────────────────────────────────────────────

    /// The reference scenario: one evaluate entry plus the three checks.
    #[test]
    fn test_seal_reference_scenario() {
        let key: Vec<u8> = (0u8..32).collect();
        let entry = LogEntry {
            timestamp: "T1".to_string(),
            action: Action::Evaluate,
            details: details(json!({ "id": "abc", "decision": "Shortlist", "score": 75 })),
        };

        let first = seal(&key, vec![entry.clone()], passing_checks(), None).unwrap();
        let again = seal(&key, vec![entry], passing_checks(), None).unwrap();

        assert_eq!(
            first.merkle_root,
            "0c218b56f0f29f5a749ac93d0575c53d33ee20be62ba0a262df1bf0a4f23bc15"
        );
        assert_eq!(
            first.signature,
            "37354015a0234256debe3492bd04106b6a54c153c48f75e786e787551961aae0"
        );
        assert_eq!(first, again, "sealing must be stable for the same key and input");
    }

    /// With no logs, the root is just the hash of the policy-check leaf.
    #[test]
    fn test_seal_empty_log_reduces_to_policy_leaf() {
        let key = [7u8; 32];
        let snapshot = seal(&key, vec![], PolicyCheckResult::new(), None).unwrap();
        assert_eq!(snapshot.merkle_root, merkle_root_hex(&[json!({})]));
    }

    // ── Tamper detection ──────────────────────────────────────────────────────

    #[test]
    fn test_tampered_log_detected() {
        let key = [1u8; 32];
        let mut snapshot = seal(
            &key,
            vec![LogEntry::now(Action::Evaluate, details(json!({ "score": 40 })))],
            passing_checks(),
            None,
        )
        .unwrap();
        assert!(verify_snapshot(&key, &snapshot).is_trusted());

        snapshot.logs[0].details.insert("score".to_string(), json!(90));
        let report = verify_snapshot(&key, &snapshot);
        assert!(!report.root_matches, "edited details must change the root");
        assert!(report.signature_valid, "the stored root itself is still signed");
        assert!(!report.is_trusted());
    }

    #[test]
    fn test_tampered_policy_checks_detected() {
        let key = [1u8; 32];
        let mut snapshot = seal(
            &key,
            vec![LogEntry::now(Action::Evaluate, Map::new())],
            PolicyCheckResult::standard(CheckStatus::Pass, CheckStatus::Fail, CheckStatus::Pass),
            None,
        )
        .unwrap();

        snapshot.policy_checks = passing_checks();
        assert!(!verify_snapshot(&key, &snapshot).is_trusted());
    }

    #[test]
    fn test_reforged_root_without_key_detected() {
        let key = [1u8; 32];
        let mut snapshot = seal(&key, vec![], passing_checks(), None).unwrap();

        snapshot.logs.push(LogEntry::now(Action::Decide, Map::new()));
        snapshot.merkle_root = merkle_root_hex(&snapshot.leaves());

        let report = verify_snapshot(&key, &snapshot);
        assert!(report.root_matches);
        assert!(!report.signature_valid, "a recomputed root needs a new signature");
    }

    // ── File-backed store ─────────────────────────────────────────────────────

    #[test]
    fn test_store_append_persists_signed_snapshot() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let snapshot = store
            .append(Action::PolicyCheck, details(json!({ "check": "bias_check" })), &passing_checks())
            .unwrap();

        assert_eq!(snapshot.merkle_root.len(), 64);
        assert_eq!(snapshot.signature.len(), 64);
        assert_eq!(store.load_snapshot(), Some(snapshot));
        assert!(store.verify_current().unwrap().unwrap().is_trusted());
    }

    #[test]
    fn test_second_append_changes_root_and_signature() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let first = store.record_evaluation(&make_record("abc", 75.0), &passing_checks()).unwrap();
        let second = store.record_evaluation(&make_record("def", 42.5), &passing_checks()).unwrap();

        assert_eq!(second.logs.len(), 2);
        assert_eq!(second.logs[0], first.logs[0], "earlier entries are never rewritten");
        assert_ne!(first.merkle_root, second.merkle_root);
        assert_ne!(first.signature, second.signature);
        assert_eq!(second.last_evaluation.unwrap().id, "def");
    }

    #[test]
    fn test_record_evaluation_appends_history_and_log() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let snapshot = store.record_evaluation(&make_record("abc", 75.0), &passing_checks()).unwrap();

        let history = store.load_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "abc");

        let entry = &snapshot.logs[0];
        assert_eq!(entry.action, Action::Evaluate);
        assert_eq!(entry.details["id"], "abc");
        assert_eq!(entry.details["decision"], "Shortlist");
        assert_eq!(entry.details["score"], 75.0);
        assert!(entry.timestamp.ends_with('Z'));
    }

    #[test]
    fn test_plain_append_keeps_last_evaluation() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.record_evaluation(&make_record("abc", 75.0), &passing_checks()).unwrap();
        let snapshot = store.append(Action::Decide, Map::new(), &passing_checks()).unwrap();

        assert_eq!(snapshot.last_evaluation.map(|r| r.id), Some("abc".to_string()));
    }

    #[test]
    fn test_reloaded_numbers_keep_their_bits() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        let floats: [f64; 5] = [0.30000000000000004, 0.9015174263023371, 1.2024011660814027, 1e-7, 5e300];
        let wide: Value = serde_json::from_str("123456789012345678901234567890").unwrap();

        let mut first_entry = None;
        for (i, x) in floats.iter().enumerate() {
            let snapshot = store
                .append(
                    Action::ScoreCalculated,
                    details(json!({ "x": x, "n": wide.clone(), "i": i })),
                    &passing_checks(),
                )
                .unwrap();
            if i == 0 {
                first_entry = Some(snapshot.logs[0].clone());
            }
        }

        let reloaded = open_store(&dir).load_snapshot().unwrap();
        for (entry, x) in reloaded.logs.iter().zip(floats) {
            let stored = entry.details["x"].as_f64().unwrap();
            assert_eq!(stored.to_bits(), x.to_bits(), "{x:?} reloaded as {stored:?}");
            assert_eq!(entry.details["n"].to_string(), "123456789012345678901234567890");
        }
        assert_eq!(Some(&reloaded.logs[0]), first_entry.as_ref(), "earlier entries are never rewritten");
        assert!(open_store(&dir).verify_current().unwrap().unwrap().is_trusted());
    }

    #[test]
    fn test_key_is_reused_across_store_instances() {
        let dir = TempDir::new().unwrap();
        let first = open_store(&dir).signing_key().unwrap();
        let second = open_store(&dir).signing_key().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.load_history().is_empty());
        assert!(store.load_snapshot().is_none());
        assert!(store.verify_current().unwrap().is_none());
    }

    #[test]
    fn test_tampered_file_fails_verification() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.record_evaluation(&make_record("abc", 55.0), &passing_checks()).unwrap();

        let path = store.storage().snapshot_path();
        let mut snapshot: AuditSnapshot =
            serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        snapshot.logs[0].details.insert("decision".to_string(), json!("Shortlist"));
        fs::write(&path, serde_json::to_vec_pretty(&snapshot).unwrap()).unwrap();

        let report = store.verify_current().unwrap().unwrap();
        assert!(!report.is_trusted());
    }

    #[test]
    fn test_verify_without_key_is_untrusted() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.append(Action::Decide, Map::new(), &passing_checks()).unwrap();
        fs::remove_file(store.storage().key_path()).unwrap();

        let report = store.verify_current().unwrap().unwrap();
        assert!(report.root_matches);
        assert!(!report.signature_valid);
        assert!(!store.storage().key_path().exists(), "verification must not create a key");
    }

    #[test]
    fn test_corrupt_snapshot_is_preserved_and_restarted() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        fs::write(store.storage().snapshot_path(), b"{ not json").unwrap();

        assert!(store.load_snapshot().is_none(), "corrupt snapshot reads as absent");
        assert!(store.verify_current().is_err(), "verification surfaces corruption");

        let snapshot = store.append(Action::Decide, Map::new(), &passing_checks()).unwrap();
        assert_eq!(snapshot.logs.len(), 1);

        let preserved = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .any(|e| e.file_name().to_string_lossy().starts_with("agentfacts.json.corrupt-"));
        assert!(preserved, "the corrupt snapshot must be kept beside the store");
    }

    #[test]
    fn test_failed_seal_restores_history() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.record_evaluation(&make_record("abc", 75.0), &passing_checks()).unwrap();
        let history_before = fs::read(store.storage().history_path()).unwrap();

        // An unreadable key makes sealing the new snapshot fail.
        let key_path = store.storage().key_path();
        fs::remove_file(&key_path).unwrap();
        fs::create_dir(&key_path).unwrap();
        let snapshot_before = fs::read(store.storage().snapshot_path()).unwrap();

        let err = store
            .record_evaluation(&make_record("def", 80.0), &passing_checks())
            .unwrap_err();
        assert!(matches!(err, verihire_contracts::error::HireError::KeyStore { .. }), "got {err:?}");
        assert_eq!(fs::read(store.storage().snapshot_path()).unwrap(), snapshot_before);
        assert_eq!(fs::read(store.storage().history_path()).unwrap(), history_before);
    }

    #[test]
    fn test_concurrent_appends_are_serialized() {
        let dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(open_store(&dir));

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    store
                        .record_evaluation(&make_record(&format!("id-{i}"), 50.0), &passing_checks())
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load_history().len(), 6, "no history update may be lost");
        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.logs.len(), 6, "no log entry may be lost");
        assert!(store.verify_current().unwrap().unwrap().is_trusted());
    }

    // ── In-memory sink ────────────────────────────────────────────────────────

    #[test]
    fn test_in_memory_sink_matches_store_semantics() {
        let sink = InMemoryAuditSink::new(vec![9u8; 32]);
        assert!(sink.verify_integrity().unwrap(), "empty sink is trivially valid");

        sink.record_evaluation(&make_record("abc", 75.0), &passing_checks()).unwrap();
        let snapshot = sink.append(Action::Decide, Map::new(), &passing_checks()).unwrap();

        assert_eq!(snapshot.logs.len(), 2);
        assert_eq!(sink.history().unwrap().len(), 1);
        assert_eq!(sink.snapshot().unwrap(), Some(snapshot));
        assert!(sink.verify_integrity().unwrap());
    }

    #[test]
    fn test_in_memory_tamper_detection() {
        let sink = InMemoryAuditSink::ephemeral();
        sink.record_evaluation(&make_record("abc", 30.0), &passing_checks()).unwrap();

        {
            let mut state = sink.state.lock().unwrap();
            let snapshot = state.snapshot.as_mut().unwrap();
            snapshot.logs[0].details.insert("decision".to_string(), json!("Shortlist"));
        }

        assert!(!sink.verify_integrity().unwrap());
    }
}
