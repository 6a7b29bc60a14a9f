//! Mapping from externally sourced profile JSON to the snapshot shape.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use tracing::debug;

use crate::record::{Position, ProfileRecord};

/// Profile as delivered by a remote service.
///
/// Keys match the snapshot, but dates arrive as strings (plain dates or full
/// timestamps) and the position may be its display label.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerProfile {
    pub full_name: String,
    pub birth_date: Option<String>,
    #[serde(default)]
    pub experience: Option<u32>,
    pub position: Option<String>,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Convert a server profile into a snapshot, parsing dates and positions.
pub fn map_server_profile(data: ServerProfile) -> Result<ProfileRecord> {
    let birth_date = data
        .birth_date
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(parse_server_date)
        .transpose()?;
    let position = data
        .position
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| Position::parse(raw).ok_or_else(|| anyhow!("unknown position '{raw}'")))
        .transpose()?;

    Ok(ProfileRecord {
        full_name: data.full_name,
        birth_date,
        experience: data.experience,
        position,
        username: data.username,
        password: data.password,
        email: data.email,
        phone_number: data.phone_number,
        notes: data.notes,
    })
}

/// Read and map a server profile JSON file.
pub fn load_server_profile(path: &Path) -> Result<ProfileRecord> {
    debug!(path = %path.display(), "loading server profile");
    let contents =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let data: ServerProfile =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    map_server_profile(data).with_context(|| format!("map {}", path.display()))
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps, and naive `YYYY-MM-DDTHH:MM:SS`.
fn parse_server_date(raw: &str) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|timestamp| timestamp.date())
        .map_err(|_| anyhow!("invalid birthDate '{raw}'"))
}
