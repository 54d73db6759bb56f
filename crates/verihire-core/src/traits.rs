//! Trait seams of the evaluation pipeline.
//!
//! - `Scorer`: pure, input in, scored record and policy checks out
//! - `AuditSink`: trusted, persists history and the signed audit snapshot
//!
//! `HiringAgent` wires them together.  Scorers never touch storage, and sinks
//! never recompute scores.

use serde_json::{Map, Value};

use verihire_contracts::{
    error::HireResult,
    evaluation::{CandidateInput, EvaluationRecord, ScoredCandidate},
    log::Action,
    policy::PolicyCheckResult,
    snapshot::AuditSnapshot,
};

/// Scores a candidate against a job description.
pub trait Scorer: Send + Sync {
    /// Produce a record and its policy checks for `input`.
    ///
    /// `evaluated_at` (Unix seconds) becomes the record's timestamp and feeds
    /// its id, so identical inputs scored at the same second share an id.
    fn score(&self, input: &CandidateInput, evaluated_at: i64) -> HireResult<ScoredCandidate>;
}

/// The append-only audit log and the evaluation history behind it.
///
/// Every successful call returns the snapshot exactly as it was persisted.
/// A failed call must leave no partially written snapshot behind.
pub trait AuditSink: Send + Sync {
    /// Append one action to the log, recompute and re-sign the Merkle root
    /// over `logs ++ [policy_checks]`, and persist the snapshot.
    ///
    /// `last_evaluation` of the prior snapshot is carried over unchanged.
    fn append(
        &self,
        action: Action,
        details: Map<String, Value>,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot>;

    /// Append `record` to the history and an `evaluate` entry to the log as
    /// one unit, setting `last_evaluation` to `record`.
    fn record_evaluation(
        &self,
        record: &EvaluationRecord,
        policy_checks: &PolicyCheckResult,
    ) -> HireResult<AuditSnapshot>;

    /// The most recently persisted snapshot, if any.
    fn snapshot(&self) -> HireResult<Option<AuditSnapshot>>;
}
