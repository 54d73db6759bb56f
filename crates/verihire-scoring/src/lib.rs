//! # verihire-scoring
//!
//! Keyword-based candidate scoring for verihire.
//!
//! [`KeywordScorer`] implements [`Scorer`](verihire_core::traits::Scorer):
//! it sanitizes the resume, matches skills against the job description,
//! scores skills, experience, and projects, and computes the three standard
//! policy checks.  [`render_report`] turns a record and its audit snapshot
//! into the text report handed to reviewers, and [`summary`] filters and
//! aggregates recorded evaluations.

pub mod checks;
pub mod report;
pub mod scorer;
pub mod summary;
pub mod text;

pub use report::render_report;
pub use scorer::KeywordScorer;
pub use summary::{summarize, HistoryQuery, ScoreSummary};

// ── Tests ─────────────────────────────────────────────────────────────────────
