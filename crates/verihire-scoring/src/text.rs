//! Resume and job-description text heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

static YEARS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})\s*\+?\s*(?:years|yrs|year)").expect("years pattern must be a valid regex")
});

/// Drop every line that mentions a PII tag, then collapse all whitespace
/// runs to single spaces.
pub fn sanitize_text(text: &str, pii_tags: &[String]) -> String {
    let tags: Vec<String> = pii_tags.iter().map(|t| t.to_lowercase()).collect();
    text.lines()
        .filter(|line| {
            let lower = line.to_lowercase();
            !tags.iter().any(|tag| lower.contains(tag.as_str()))
        })
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Vocabulary skills mentioned anywhere in `text`, sorted.
///
/// Matching is a case-insensitive substring test, so short skills such as
/// `ai` also match inside longer words.
pub fn extract_skills(text: &str, vocabulary: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut found: Vec<String> = vocabulary
        .iter()
        .filter(|skill| lower.contains(skill.as_str()))
        .cloned()
        .collect();
    found.sort();
    found
}

/// Split a comma-separated skill list into trimmed, lowercased entries.
pub fn parse_skill_list(skills_text: &str) -> Vec<String> {
    skills_text
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Years of experience claimed in `text`.
///
/// The largest "N years" / "N yrs" / "N+ year" figure wins.  Without one,
/// seniority words decide: "senior" → 6, "mid" → 3, otherwise 1.
pub fn extract_experience_years(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let max = YEARS_PATTERN
        .captures_iter(&lower)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u32>().ok())
        .max();
    match max {
        Some(years) => f64::from(years),
        None if lower.contains("senior") => 6.0,
        None if lower.contains("mid") => 3.0,
        None => 1.0,
    }
}

/// Number of times "project" occurs in `text`, case-insensitively.
pub fn count_projects(text: &str) -> u32 {
    let count = text.to_lowercase().matches("project").count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
