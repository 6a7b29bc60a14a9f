//! Initialization helpers for `.profile/` scaffolding.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::config::{ProfileConfig, write_config};
use super::profile_store::write_profile;
use crate::record::default_profile;

pub const PROFILE_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/profile/v1.schema.json"
));

/// All canonical paths within `.profile/` for a project root.
#[derive(Debug, Clone)]
pub struct ProfilePaths {
    pub profile_dir: PathBuf,
    pub profile_path: PathBuf,
    pub schema_path: PathBuf,
    pub config_path: PathBuf,
}

impl ProfilePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let profile_dir = root.into().join(".profile");
        Self {
            profile_dir: profile_dir.clone(),
            profile_path: profile_dir.join("profile.json"),
            schema_path: profile_dir.join("schema.json"),
            config_path: profile_dir.join("config.toml"),
        }
    }

    /// True when the committed snapshot and its schema are both present.
    pub fn is_initialized(&self) -> bool {
        self.profile_path.is_file() && self.schema_path.is_file()
    }
}

/// Options for `init_profile`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing profile-owned files.
    pub force: bool,
}

/// Create `.profile/` scaffolding in `root`, seeded with the sample profile.
///
/// Fails if `.profile/` already exists unless `options.force` is set.
pub fn init_profile(root: &Path, options: &InitOptions) -> Result<ProfilePaths> {
    let paths = ProfilePaths::new(root);
    if paths.profile_dir.exists() && !paths.profile_dir.is_dir() {
        return Err(anyhow!(
            "profile init: .profile exists but is not a directory"
        ));
    }
    if paths.profile_dir.exists() && !options.force {
        return Err(anyhow!(
            "profile init: .profile already exists (use --force to overwrite)"
        ));
    }

    fs::create_dir_all(&paths.profile_dir)
        .with_context(|| format!("create directory {}", paths.profile_dir.display()))?;
    fs::write(&paths.schema_path, PROFILE_SCHEMA)
        .with_context(|| format!("write file {}", paths.schema_path.display()))?;
    write_profile(&paths.profile_path, &default_profile())?;
    write_config(&paths.config_path, &ProfileConfig::default())?;

    info!(dir = %paths.profile_dir.display(), force = options.force, "initialized profile");
    Ok(paths)
}
