//! Policy checks computed alongside every evaluation.
//!
//! - `data_sanitization`: no PII tag survives in the scored text or the
//!   candidate's skill tokens
//! - `bias_check`: no scoring token names a protected attribute
//! - `scoring_integrity`: the breakdown is bounded, sums to the total, and
//!   agrees with the decision

use verihire_contracts::{
    config::ScoringConfig,
    evaluation::{Decision, EvaluationRecord},
    policy::{CheckStatus, PolicyCheckResult},
};

/// Tolerance for the sum of rounded components versus the rounded total.
const SUM_TOLERANCE: f64 = 0.01;

/// What the checks inspect: the text that was scored and the tokens derived
/// from it.
pub struct CheckInputs<'a> {
    pub sanitized_text: &'a str,
    pub skills: &'a [String],
    pub required: &'a [String],
}

pub fn run_policy_checks(
    config: &ScoringConfig,
    inputs: &CheckInputs<'_>,
    record: &EvaluationRecord,
) -> PolicyCheckResult {
    PolicyCheckResult::standard(
        CheckStatus::from_bool(bias_free(config, inputs)),
        CheckStatus::from_bool(sanitized(config, inputs)),
        CheckStatus::from_bool(scoring_consistent(config, record)),
    )
}

fn sanitized(config: &ScoringConfig, inputs: &CheckInputs<'_>) -> bool {
    let text = inputs.sanitized_text.to_lowercase();
    config.pii_tags.iter().map(|t| t.to_lowercase()).all(|tag| {
        !text.contains(tag.as_str()) && !inputs.skills.iter().any(|s| s.contains(tag.as_str()))
    })
}

fn bias_free(config: &ScoringConfig, inputs: &CheckInputs<'_>) -> bool {
    let protected: Vec<String> = config
        .pii_tags
        .iter()
        .map(|t| t.trim().trim_end_matches(':').trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();
    inputs
        .skills
        .iter()
        .chain(inputs.required.iter())
        .all(|token| !protected.iter().any(|p| p == token))
}

fn scoring_consistent(config: &ScoringConfig, record: &EvaluationRecord) -> bool {
    let scores = &record.scores;
    let bounded = [
        (scores.skills, config.skills_weight),
        (scores.experience, config.experience_weight),
        (scores.projects, config.projects_weight),
    ]
    .iter()
    .all(|(value, cap)| value.is_finite() && *value >= 0.0 && *value <= *cap + SUM_TOLERANCE);

    let sum = scores.skills + scores.experience + scores.projects;
    let sums_up = (sum - record.total_score).abs() <= SUM_TOLERANCE;

    let expected = if record.total_score >= config.shortlist_threshold {
        Decision::Shortlist
    } else {
        Decision::Reject
    };

    let percent_ok = (0.0..=100.0).contains(&record.skill_match_percent);

    bounded && sums_up && record.decision == expected && percent_ok
}
