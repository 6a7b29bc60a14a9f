//! Snapshot load/save helpers with schema validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use super::write_atomic;
use crate::record::ProfileRecord;

/// Load a snapshot from disk, checking its shape against the JSON Schema.
///
/// Field rules are not applied here; a stored snapshot may be checked with
/// `core::validator` separately.
pub fn load_profile(schema_path: &Path, profile_path: &Path) -> Result<ProfileRecord> {
    debug!(path = %profile_path.display(), "loading profile snapshot");
    let contents = fs::read_to_string(profile_path)
        .with_context(|| format!("read profile {}", profile_path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse profile {}", profile_path.display()))?;
    validate_schema(schema_path, &value)?;
    let record: ProfileRecord = serde_json::from_value(value)
        .with_context(|| format!("deserialize profile {}", profile_path.display()))?;
    Ok(record)
}

/// Atomically write a snapshot (temp file + rename).
pub fn write_profile(path: &Path, record: &ProfileRecord) -> Result<()> {
    debug!(path = %path.display(), username = %record.username, "writing profile snapshot");
    let mut buf = serde_json::to_string_pretty(record).context("serialize profile")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn validate_schema(schema_path: &Path, profile: &Value) -> Result<()> {
    let schema_contents = fs::read_to_string(schema_path)
        .with_context(|| format!("read schema {}", schema_path.display()))?;
    let schema_value: Value = serde_json::from_str(&schema_contents)
        .with_context(|| format!("parse schema {}", schema_path.display()))?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(profile) {
        let messages = compiled
            .iter_errors(profile)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "profile schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}
