//! `profile validate`: check a stored snapshot against the field rules.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::debug;

use crate::core::types::FieldError;
use crate::core::validator::validate_record;
use crate::io::config::load_config;
use crate::io::init::ProfilePaths;
use crate::io::profile_store::load_profile;

/// High-level validation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    /// Snapshot file that was checked.
    pub path: PathBuf,
    /// Failing fields in form order; empty when the snapshot is valid.
    pub errors: Vec<FieldError>,
}

impl ValidateOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate `file` (or the committed snapshot) under the project's config.
///
/// Shape problems (unreadable file, schema violations) are errors; rule
/// failures are reported in the outcome.
pub fn validate_profile(root: &Path, file: Option<&Path>, today: NaiveDate) -> Result<ValidateOutcome> {
    let paths = ProfilePaths::new(root);
    let config = load_config(&paths.config_path).context("load config.toml")?;
    let path = file.map_or_else(|| paths.profile_path.clone(), Path::to_path_buf);
    let record = load_profile(&paths.schema_path, &path).context("load profile for validation")?;

    let rules = config.validation().rules;
    let errors = validate_record(&record, &rules, today);
    debug!(path = %path.display(), errors = errors.len(), "validated profile");
    Ok(ValidateOutcome { path, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::profile_store::write_profile;
    use crate::test_support::{TestProject, fixed_today, valid_record};

    #[test]
    fn committed_sample_profile_is_valid() {
        let project = TestProject::new().expect("project");
        let outcome = validate_profile(project.path(), None, fixed_today()).expect("validate");
        assert!(outcome.is_valid(), "{:?}", outcome.errors);
        assert_eq!(outcome.path, project.paths.profile_path);
    }

    #[test]
    fn reports_rule_failures_for_explicit_file() {
        let project = TestProject::new().expect("project");
        let mut record = valid_record();
        record.email = "not-an-email".to_string();
        record.password = Some("123".to_string());
        let path = project.path().join("candidate.json");
        write_profile(&path, &record).expect("write");

        let outcome = validate_profile(project.path(), Some(&path), fixed_today()).expect("validate");
        let messages: Vec<String> = outcome.errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "password: Password must be at least 6 characters".to_string(),
                "email: Invalid email format".to_string(),
            ]
        );
    }

    /// A stricter config tightens the checks without touching the snapshot.
    #[test]
    fn honors_config_policy() {
        let project = TestProject::new().expect("project");
        std::fs::write(&project.paths.config_path, "[rules]\nnotes_max = 5\n").expect("config");
        let outcome = validate_profile(project.path(), None, fixed_today()).expect("validate");
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].message, "Notes cannot exceed 5 characters");
    }
}
