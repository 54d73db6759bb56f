//! Configuration schema.
//!
//! Deserialized from TOML by `verihire_core::config`.  Every field has a
//! default, so an empty document yields a working configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HireConfig {
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
}

/// Where the history, snapshot, key, and lock files live.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub history_file: String,
    pub snapshot_file: String,
    pub key_file: String,
    pub lock_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".verihire"),
            history_file: "history.json".to_string(),
            snapshot_file: "agentfacts.json".to_string(),
            key_file: "secret.key".to_string(),
            lock_file: "audit.lock".to_string(),
        }
    }
}

impl StorageConfig {
    /// Default file names rooted at `data_dir`.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir.join(&self.snapshot_file)
    }

    pub fn key_path(&self) -> PathBuf {
        self.data_dir.join(&self.key_file)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.data_dir.join(&self.lock_file)
    }
}

/// Keyword-scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Vocabulary matched against resumes and job descriptions (lowercase).
    pub skills: Vec<String>,
    pub skills_weight: f64,
    pub experience_weight: f64,
    pub projects_weight: f64,
    /// Years at which the experience component saturates.
    pub experience_full_years: f64,
    /// Project count at which the projects component saturates.
    pub projects_full_count: f64,
    /// Minimum total for a `Shortlist` decision.
    pub shortlist_threshold: f64,
    /// Resume lines containing any of these (case-insensitive) are dropped.
    pub pii_tags: Vec<String>,
    /// Experience is listed as a strength from this many years.
    pub strength_min_years: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let skills = [
            "python", "java", "sql", "aws", "docker", "react", "ml", "ai", "api", "cloud", "flask",
            "django",
        ];
        let pii_tags = ["name:", "gender:", "age:", "address:"];
        Self {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            skills_weight: 60.0,
            experience_weight: 25.0,
            projects_weight: 15.0,
            experience_full_years: 5.0,
            projects_full_count: 3.0,
            shortlist_threshold: 60.0,
            pii_tags: pii_tags.iter().map(|s| s.to_string()).collect(),
            strength_min_years: 3.0,
        }
    }
}
