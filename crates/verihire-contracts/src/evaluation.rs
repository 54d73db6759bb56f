//! Candidate input and evaluation record types.
//!
//! `CandidateInput` is what a caller submits.  `EvaluationRecord` is what the
//! pipeline produces and appends to the history store, one per evaluation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{policy::PolicyCheckResult, snapshot::AuditSnapshot};

/// The hiring decision attached to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Shortlist,
    Reject,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Shortlist => f.write_str("Shortlist"),
            Decision::Reject => f.write_str("Reject"),
        }
    }
}

/// Per-component scores.  Field order matches the order they are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub skills: f64,
    pub experience: f64,
    pub projects: f64,
}

impl ScoreBreakdown {
    /// `(name, value)` pairs in reporting order.
    pub fn components(&self) -> [(&'static str, f64); 3] {
        [
            ("skills", self.skills),
            ("experience", self.experience),
            ("projects", self.projects),
        ]
    }
}

/// Everything a caller supplies for one evaluation.
///
/// Either `skills_text` (comma-separated) or `resume_text` should carry the
/// candidate's skills; `skills_text` wins when both are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateInput {
    pub name: String,
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub skills_text: String,
    /// Overrides the years parsed from the resume when present.
    #[serde(default)]
    pub years_experience: Option<f64>,
    /// Free text describing projects; each "project" mention counts once.
    #[serde(default)]
    pub projects_text: String,
    #[serde(default)]
    pub job_description: String,
}

/// One entry of the evaluation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    /// Hex SHA-256 of `"{name}-{timestamp}"`.
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub years_experience: f64,
    pub projects: u32,
    #[serde(default)]
    pub job_description: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub extra_skills: Vec<String>,
    /// Percentage rounded to one decimal place.
    pub skill_match_percent: f64,
    pub scores: ScoreBreakdown,
    pub total_score: f64,
    pub decision: Decision,
    pub strengths: Vec<String>,
    pub reasoning: String,
    /// Unix seconds.
    pub timestamp: i64,
}

/// A scored record together with the policy checks computed alongside it.
///
/// Produced by a `Scorer`; nothing has been persisted yet.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub record: EvaluationRecord,
    pub policy_checks: PolicyCheckResult,
}

/// The result of a persisted evaluation: the record and the audit snapshot
/// that was written with it.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationOutcome {
    pub record: EvaluationRecord,
    pub snapshot: AuditSnapshot,
}
