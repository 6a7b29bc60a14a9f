//! Profile configuration stored under `.profile/config.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::write_atomic;
use crate::core::dependencies::FieldDependencies;
use crate::core::rules::RuleSet;
use crate::core::session::Validation;
use crate::core::types::RulePolicy;

/// Profile configuration (TOML).
///
/// This file is intended to be edited by humans. Missing fields default to
/// the bounds the form has always enforced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ProfileConfig {
    pub rules: RulePolicy,
}

impl ProfileConfig {
    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;
        if rules.max_age_years == 0 {
            return Err(anyhow!("rules.max_age_years must be > 0"));
        }
        if rules.max_experience_years > rules.max_age_years {
            return Err(anyhow!(
                "rules.max_experience_years ({}) must not exceed rules.max_age_years ({})",
                rules.max_experience_years,
                rules.max_age_years
            ));
        }
        if rules.username_min == 0 {
            return Err(anyhow!("rules.username_min must be > 0"));
        }
        check_bounds("username", rules.username_min, rules.username_max)?;
        check_bounds("password", rules.password_min, rules.password_max)?;
        if rules.notes_max == 0 {
            return Err(anyhow!("rules.notes_max must be > 0"));
        }
        Ok(())
    }

    /// Rule set and dependency graph for sessions under this config.
    pub fn validation(&self) -> Validation {
        Validation::new(
            RuleSet::standard(&self.rules),
            FieldDependencies::standard(),
        )
    }
}

fn check_bounds(name: &str, min: usize, max: usize) -> Result<()> {
    if min > max {
        return Err(anyhow!(
            "rules.{name}_min ({min}) must not exceed rules.{name}_max ({max})"
        ));
    }
    Ok(())
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `ProfileConfig::default()`.
pub fn load_config(path: &Path) -> Result<ProfileConfig> {
    if !path.exists() {
        let cfg = ProfileConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: ProfileConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &ProfileConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}
