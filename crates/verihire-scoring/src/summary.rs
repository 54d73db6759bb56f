//! History filtering and score statistics for dashboards and comparisons.

use verihire_contracts::evaluation::{Decision, EvaluationRecord};

/// Which records a history listing shows and in what order.
///
/// Records are always sorted by total score, highest first unless
/// `ascending` is set.  Equal scores keep their recorded order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryQuery {
    pub decision: Option<Decision>,
    pub ascending: bool,
}

impl HistoryQuery {
    pub fn apply<'a>(&self, records: &'a [EvaluationRecord]) -> Vec<&'a EvaluationRecord> {
        let mut selected: Vec<&EvaluationRecord> = records
            .iter()
            .filter(|record| self.decision.map_or(true, |d| record.decision == d))
            .collect();
        if self.ascending {
            selected.sort_by(|a, b| a.total_score.total_cmp(&b.total_score));
        } else {
            selected.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));
        }
        selected
    }
}

/// Aggregate figures over a set of evaluations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

/// Summarize `records`; `None` when there is nothing to summarize.
pub fn summarize<'a, I>(records: I) -> Option<ScoreSummary>
where
    I: IntoIterator<Item = &'a EvaluationRecord>,
{
    let mut summary: Option<ScoreSummary> = None;
    let mut total = 0.0;
    for record in records {
        let score = record.total_score;
        total += score;
        let entry = summary.get_or_insert(ScoreSummary {
            count: 0,
            shortlisted: 0,
            rejected: 0,
            average: 0.0,
            highest: score,
            lowest: score,
        });
        entry.count += 1;
        match record.decision {
            Decision::Shortlist => entry.shortlisted += 1,
            Decision::Reject => entry.rejected += 1,
        }
        entry.highest = entry.highest.max(score);
        entry.lowest = entry.lowest.min(score);
    }
    summary.map(|mut s| {
        s.average = total / s.count as f64;
        s
    })
}
