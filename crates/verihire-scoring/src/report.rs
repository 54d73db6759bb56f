//! Plain-text evaluation report.

use chrono::Utc;

use verihire_contracts::{
    evaluation::EvaluationRecord, log::iso_timestamp, snapshot::AuditSnapshot,
};

use crate::scorer::display_float;

/// Render `record` with the audit facts of `snapshot` as a text document.
pub fn render_report(record: &EvaluationRecord, snapshot: &AuditSnapshot) -> String {
    let mut lines = vec![
        format!("Candidate: {}", record.name),
        format!("Date: {}", iso_timestamp(Utc::now())),
        format!("Score: {}", display_float(record.total_score)),
        "\nBreakdown:".to_string(),
    ];
    for (name, value) in record.scores.components() {
        lines.push(format!(" - {}: {}", name, display_float(value)));
    }
    lines.push(format!("Decision: {}", record.decision));
    lines.push("\nExplanation:".to_string());
    lines.push(record.reasoning.clone());
    lines.push("\nPolicy checks:".to_string());
    for (name, status) in snapshot.policy_checks.iter() {
        lines.push(format!(" - {}: {}", name, status.as_str()));
    }
    lines.push(format!("Merkle root: {}", snapshot.merkle_root));
    lines.push(format!("Signature: {}", snapshot.signature));
    lines.join("\n")
}
