//! The keyword scorer.
//!
//! Score = skills (share of required skills matched) + experience (years,
//! saturating) + projects (count, saturating), each scaled to its configured
//! weight and rounded to two decimals.

use sha2::{Digest, Sha256};
use tracing::debug;

use verihire_contracts::{
    config::ScoringConfig,
    error::HireResult,
    evaluation::{CandidateInput, Decision, EvaluationRecord, ScoreBreakdown, ScoredCandidate},
};
use verihire_core::traits::Scorer;

use crate::{
    checks::{run_policy_checks, CheckInputs},
    text::{count_projects, extract_experience_years, extract_skills, parse_skill_list, sanitize_text},
};

/// Scores candidates with the keyword heuristics of a `ScoringConfig`.
#[derive(Debug, Clone, Default)]
pub struct KeywordScorer {
    config: ScoringConfig,
}

impl KeywordScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, input: &CandidateInput, evaluated_at: i64) -> HireResult<ScoredCandidate> {
        let cfg = &self.config;
        let resume = sanitize_text(&input.resume_text, &cfg.pii_tags);

        let skills = if input.skills_text.trim().is_empty() {
            extract_skills(&resume, &cfg.skills)
        } else {
            parse_skill_list(&input.skills_text)
        };
        let required = extract_skills(&input.job_description, &cfg.skills);

        let matched: Vec<String> = skills.iter().filter(|s| required.contains(s)).cloned().collect();
        let missing: Vec<String> = required.iter().filter(|s| !skills.contains(s)).cloned().collect();
        let extra: Vec<String> = skills.iter().filter(|s| !required.contains(s)).cloned().collect();

        let skill_pct = if required.is_empty() {
            let vocabulary = cfg.skills.len().max(1) as f64;
            (skills.len() as f64 / vocabulary).min(1.0) * 100.0
        } else {
            matched.len() as f64 / required.len() as f64 * 100.0
        };

        let years = match input.years_experience {
            Some(years) => years,
            None if !resume.is_empty() => extract_experience_years(&resume),
            None => 0.0,
        };

        let projects = if !input.projects_text.is_empty() {
            count_projects(&input.projects_text)
        } else {
            count_projects(&resume)
        };

        let scores = ScoreBreakdown {
            skills: round_to(skill_pct / 100.0 * cfg.skills_weight, 2),
            experience: round_to(
                (years / cfg.experience_full_years).min(1.0) * cfg.experience_weight,
                2,
            ),
            projects: round_to(
                (f64::from(projects) / cfg.projects_full_count).min(1.0) * cfg.projects_weight,
                2,
            ),
        };
        let total = round_to(scores.skills + scores.experience + scores.projects, 2);
        let decision = if total >= cfg.shortlist_threshold {
            Decision::Shortlist
        } else {
            Decision::Reject
        };

        let mut strengths = Vec::new();
        if !matched.is_empty() {
            strengths.push(format!("Matched skills: {}", matched.join(", ")));
        }
        if years >= cfg.strength_min_years {
            strengths.push(format!("Experience: {} years", display_float(years)));
        }
        if projects > 0 {
            strengths.push(format!("Projects: {}", projects));
        }

        let reasoning = format!(
            "Skills {}/{}, Experience {}/{}, Projects {}/{} -> Total {}/100.",
            scores.skills.trunc(),
            cfg.skills_weight,
            scores.experience.trunc(),
            cfg.experience_weight,
            scores.projects.trunc(),
            cfg.projects_weight,
            display_float(total),
        );

        let id = hex::encode(Sha256::digest(format!("{}-{}", input.name, evaluated_at).as_bytes()));

        let record = EvaluationRecord {
            id,
            name: input.name.clone(),
            skills: skills.clone(),
            years_experience: years,
            projects,
            job_description: input.job_description.clone(),
            matched_skills: matched,
            missing_skills: missing,
            extra_skills: extra,
            skill_match_percent: round_to(skill_pct, 1),
            scores,
            total_score: total,
            decision,
            strengths,
            reasoning,
            timestamp: evaluated_at,
        };

        let policy_checks = run_policy_checks(
            cfg,
            &CheckInputs {
                sanitized_text: &resume,
                skills: &skills,
                required: &required,
            },
            &record,
        );

        debug!(
            id = %record.id,
            skill_match_percent = record.skill_match_percent,
            years = years,
            projects = projects,
            total = total,
            "keyword scoring complete"
        );

        Ok(ScoredCandidate { record, policy_checks })
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Render a float the way stored reports always have: integral values keep
/// a trailing `.0`.
pub fn display_float(value: f64) -> String {
    let rendered = value.to_string();
    if value.is_finite() && !rendered.contains('.') {
        format!("{}.0", rendered)
    } else {
        rendered
    }
}
