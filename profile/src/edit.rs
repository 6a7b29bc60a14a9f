//! One-shot edit sessions for `profile edit` and `profile import`.
//!
//! Loads the committed snapshot, drives a [`SessionState`] through
//! toggle-edit, field edits and save (or cancel), and persists the committed
//! snapshot when the save succeeds.

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::session::{SessionState, Transition, Validation};
use crate::core::types::{Field, FieldEdit, FieldError, Notification};
use crate::io::config::load_config;
use crate::io::init::ProfilePaths;
use crate::io::profile_store::{load_profile, write_profile};
use crate::record::ProfileRecord;

/// Structured result of an edit session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Every rule passed; the snapshot was committed and written.
    Saved {
        record: ProfileRecord,
        notification: Notification,
    },
    /// At least one rule failed; nothing was written.
    Rejected {
        errors: Vec<FieldError>,
        notification: Notification,
    },
    /// Edits were discarded; the committed snapshot is unchanged.
    Cancelled { record: ProfileRecord },
}

/// Parse a `FIELD=VALUE` assignment into a typed edit.
pub fn parse_assignment(raw: &str) -> Result<FieldEdit> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = Field::parse_key(key).ok_or_else(|| anyhow!("unknown field '{}'", key.trim()))?;
    FieldEdit::parse(field, value).map_err(|err| anyhow!("{field}: {err}"))
}

/// Run one session against the project's committed snapshot.
pub fn run_edit(root: &Path, edits: Vec<FieldEdit>, cancel: bool, today: NaiveDate) -> Result<EditOutcome> {
    let paths = ProfilePaths::new(root);
    let config = load_config(&paths.config_path).context("load config.toml")?;
    let committed = load_profile(&paths.schema_path, &paths.profile_path)
        .context("load committed profile")?;

    let outcome = edit_session(committed, edits, cancel, &config.validation(), today);
    if let EditOutcome::Saved { record, .. } = &outcome {
        write_profile(&paths.profile_path, record).context("write committed profile")?;
        info!(username = %record.username, "profile committed");
    }
    Ok(outcome)
}

/// Drive an in-memory session: toggle edit, apply `edits`, then save or cancel.
pub fn edit_session(
    committed: ProfileRecord,
    edits: Vec<FieldEdit>,
    cancel: bool,
    validation: &Validation,
    today: NaiveDate,
) -> EditOutcome {
    let mut state = log_transition(SessionState::new(committed).toggle_edit());
    for edit in edits {
        state = log_transition(state.edit_field(edit, validation, today));
    }

    if cancel {
        let state = log_transition(state.cancel());
        return EditOutcome::Cancelled {
            record: state.committed,
        };
    }

    let transition = state.save(validation, today);
    let committed = transition.summary.committed;
    let notification = transition.notification.clone();
    let state = log_transition(transition);
    match (committed, notification) {
        (true, Some(notification)) => EditOutcome::Saved {
            record: state.committed,
            notification,
        },
        (_, notification) => EditOutcome::Rejected {
            errors: state.field_errors(),
            notification: notification
                .unwrap_or_else(|| Notification::Failure("Profile not saved".to_string())),
        },
    }
}

fn log_transition(transition: Transition) -> SessionState {
    let summary = &transition.summary;
    debug!(
        action = summary.action,
        from = ?summary.from,
        to = ?summary.to,
        ignored = summary.ignored,
        errors = transition.state.errors.len(),
        "session transition"
    );
    transition.state
}
