//! The hiring agent: validated, scored, audited evaluations.
//!
//! Pipeline per candidate:
//!
//!   Validate → Score (+ policy checks) → Persist history + signed snapshot
//!
//! A record is only returned after the sink has persisted both the history
//! entry and the re-signed snapshot.  Any sink error aborts the evaluation.

use chrono::Utc;
use tracing::{debug, info, warn};

use verihire_contracts::{
    error::{HireError, HireResult},
    evaluation::{CandidateInput, EvaluationOutcome},
    policy::CheckStatus,
};

use crate::traits::{AuditSink, Scorer};

/// Maximum number of candidates ranked in one batch.
pub const MAX_BATCH: usize = 5;

/// Drives evaluations through a scorer and an audit sink.
pub struct HiringAgent {
    scorer: Box<dyn Scorer>,
    audit: Box<dyn AuditSink>,
}

impl HiringAgent {
    pub fn new(scorer: Box<dyn Scorer>, audit: Box<dyn AuditSink>) -> Self {
        Self { scorer, audit }
    }

    /// The sink this agent appends to.
    pub fn audit(&self) -> &dyn AuditSink {
        self.audit.as_ref()
    }

    /// Evaluate one candidate and persist the result.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` when the name is blank, no resume or skills were
    ///   given, or `years_experience` is negative or not finite
    /// - any error from the scorer
    /// - `StorageWrite` / `KeyStore` / `LockFailed` from the sink; no record
    ///   is returned in that case
    pub fn evaluate_candidate(&self, input: &CandidateInput) -> HireResult<EvaluationOutcome> {
        validate(input)?;

        let evaluated_at = Utc::now().timestamp();
        let scored = self.scorer.score(input, evaluated_at)?;

        debug!(
            id = %scored.record.id,
            total_score = scored.record.total_score,
            decision = %scored.record.decision,
            "candidate scored"
        );

        if !scored.policy_checks.all_pass() {
            let failed: Vec<&str> = scored
                .policy_checks
                .iter()
                .filter(|(_, status)| *status == CheckStatus::Fail)
                .map(|(name, _)| name)
                .collect();
            warn!(id = %scored.record.id, failed = ?failed, "policy checks failed for evaluation");
        }

        let snapshot = self
            .audit
            .record_evaluation(&scored.record, &scored.policy_checks)?;

        info!(
            id = %scored.record.id,
            decision = %scored.record.decision,
            entries = snapshot.logs.len(),
            merkle_root = %snapshot.merkle_root,
            "evaluation recorded"
        );

        Ok(EvaluationOutcome {
            record: scored.record,
            snapshot,
        })
    }

    /// Evaluate up to `MAX_BATCH` candidates and rank them by total score.
    ///
    /// Each candidate goes through the full pipeline, so each one appends its
    /// own log entry.  The first failure aborts the batch; candidates already
    /// evaluated stay recorded.  Ties keep their input order.
    pub fn evaluate_batch(&self, inputs: &[CandidateInput]) -> HireResult<Vec<EvaluationOutcome>> {
        if inputs.len() > MAX_BATCH {
            warn!(
                submitted = inputs.len(),
                max = MAX_BATCH,
                "batch exceeds maximum; evaluating only the first candidates"
            );
        }

        let mut outcomes = inputs
            .iter()
            .take(MAX_BATCH)
            .map(|input| self.evaluate_candidate(input))
            .collect::<HireResult<Vec<_>>>()?;

        outcomes.sort_by(|a, b| b.record.total_score.total_cmp(&a.record.total_score));
        Ok(outcomes)
    }
}

fn validate(input: &CandidateInput) -> HireResult<()> {
    if input.name.trim().is_empty() {
        return Err(HireError::InvalidInput {
            reason: "candidate name is required".to_string(),
        });
    }
    if input.resume_text.trim().is_empty() && input.skills_text.trim().is_empty() {
        return Err(HireError::InvalidInput {
            reason: format!("no resume or skills provided for '{}'", input.name),
        });
    }
    if let Some(years) = input.years_experience {
        if !years.is_finite() || years < 0.0 {
            return Err(HireError::InvalidInput {
                reason: format!("years_experience must be a non-negative number, got {}", years),
            });
        }
    }
    Ok(())
}
