//! Test-only helpers: deterministic dates, records and project layouts.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tempfile::TempDir;

use crate::io::init::{InitOptions, ProfilePaths, init_profile};
use crate::io::profile_store::load_profile;
use crate::record::{ProfileRecord, default_profile};

/// Evaluation date used by deterministic tests.
pub fn fixed_today() -> NaiveDate {
    date(2026, 10, 18)
}

/// Build a calendar date, panicking on invalid input.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// A record that passes every standard rule on [`fixed_today`].
pub fn valid_record() -> ProfileRecord {
    ProfileRecord {
        password: Some("secret12".to_string()),
        ..default_profile()
    }
}

/// Initialized `.profile/` layout in a temporary directory.
pub struct TestProject {
    temp: TempDir,
    pub paths: ProfilePaths,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let paths = init_profile(temp.path(), &InitOptions { force: false })?;
        Ok(Self { temp, paths })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn read_profile(&self) -> Result<ProfileRecord> {
        load_profile(&self.paths.schema_path, &self.paths.profile_path)
    }
}
