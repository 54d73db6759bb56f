//! TOML configuration loading.
//!
//! ```toml
//! [storage]
//! data_dir = "/var/lib/verihire"
//!
//! [scoring]
//! skills = ["rust", "sql", "aws"]
//! shortlist_threshold = 65.0
//! ```
//!
//! Omitted sections and fields fall back to their defaults.

use std::path::Path;

use tracing::debug;

use verihire_contracts::{
    config::HireConfig,
    error::{HireError, HireResult},
};

/// Parse `s` as a TOML configuration document and validate it.
///
/// Returns `HireError::ConfigError` if the TOML is malformed, does not match
/// the `HireConfig` schema, or holds values scoring cannot work with.
pub fn from_toml_str(s: &str) -> HireResult<HireConfig> {
    let config: HireConfig = toml::from_str(s).map_err(|e| HireError::ConfigError {
        reason: format!("failed to parse configuration TOML: {}", e),
    })?;
    validate(&config)?;
    Ok(config)
}

/// Read the file at `path` and parse it as TOML configuration.
pub fn from_file(path: &Path) -> HireResult<HireConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| HireError::ConfigError {
        reason: format!("failed to read configuration file '{}': {}", path.display(), e),
    })?;
    let config = from_toml_str(&contents)?;
    debug!(path = %path.display(), data_dir = %config.storage.data_dir.display(), "configuration loaded");
    Ok(config)
}

fn validate(config: &HireConfig) -> HireResult<()> {
    let scoring = &config.scoring;

    if scoring.skills.is_empty() {
        return Err(HireError::ConfigError {
            reason: "scoring.skills must list at least one skill".to_string(),
        });
    }

    let weights = [
        ("skills_weight", scoring.skills_weight),
        ("experience_weight", scoring.experience_weight),
        ("projects_weight", scoring.projects_weight),
        ("shortlist_threshold", scoring.shortlist_threshold),
        ("strength_min_years", scoring.strength_min_years),
    ];
    for (name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(HireError::ConfigError {
                reason: format!("scoring.{} must be a non-negative number, got {}", name, value),
            });
        }
    }

    let saturation = [
        ("experience_full_years", scoring.experience_full_years),
        ("projects_full_count", scoring.projects_full_count),
    ];
    for (name, value) in saturation {
        if !value.is_finite() || value <= 0.0 {
            return Err(HireError::ConfigError {
                reason: format!("scoring.{} must be positive, got {}", name, value),
            });
        }
    }

    let storage = &config.storage;
    let files = [
        ("history_file", &storage.history_file),
        ("snapshot_file", &storage.snapshot_file),
        ("key_file", &storage.key_file),
        ("lock_file", &storage.lock_file),
    ];
    for (name, file) in files {
        if file.trim().is_empty() {
            return Err(HireError::ConfigError {
                reason: format!("storage.{} must not be empty", name),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use verihire_contracts::error::HireError;

    use super::{from_file, from_toml_str};

    #[test]
    fn empty_document_uses_defaults() {
        let config = from_toml_str("").unwrap();
        assert_eq!(config.storage.snapshot_file, "agentfacts.json");
        assert_eq!(config.scoring.skills.len(), 12);
        assert_eq!(config.scoring.shortlist_threshold, 60.0);
    }

    #[test]
    fn partial_sections_override_only_given_fields() {
        let config = from_toml_str(
            r#"
            [storage]
            data_dir = "/srv/hiring"

            [scoring]
            skills = ["rust", "sql"]
            shortlist_threshold = 70.0
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.data_dir, std::path::PathBuf::from("/srv/hiring"));
        assert_eq!(config.storage.key_file, "secret.key");
        assert_eq!(config.scoring.skills, vec!["rust", "sql"]);
        assert_eq!(config.scoring.shortlist_threshold, 70.0);
        assert_eq!(config.scoring.skills_weight, 60.0);
    }

    #[test]
    fn bundled_sample_matches_defaults() {
        let config = from_toml_str(include_str!("../../../config/verihire.toml")).unwrap();
        let defaults = verihire_contracts::config::HireConfig::default();
        assert_eq!(config.scoring.skills, defaults.scoring.skills);
        assert_eq!(config.scoring.pii_tags, defaults.scoring.pii_tags);
        assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
        assert_eq!(config.storage.snapshot_path(), defaults.storage.snapshot_path());
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = from_toml_str("[storage\ndata_dir = 1").unwrap_err();
        assert!(matches!(err, HireError::ConfigError { .. }), "got {err:?}");
    }

    #[test]
    fn empty_skill_list_is_rejected() {
        let err = from_toml_str("[scoring]\nskills = []").unwrap_err();
        assert!(err.to_string().contains("scoring.skills"));
    }

    #[test]
    fn zero_saturation_is_rejected() {
        let err = from_toml_str("[scoring]\nexperience_full_years = 0.0").unwrap_err();
        assert!(err.to_string().contains("experience_full_years"));
    }

    #[test]
    fn from_file_reads_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\nkey_file = \"signing.key\"").unwrap();
        let config = from_file(file.path()).unwrap();
        assert_eq!(config.storage.key_file, "signing.key");
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let err = from_file(std::path::Path::new("/nonexistent/verihire.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read configuration file"));
    }
}
