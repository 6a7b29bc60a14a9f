//! Edit/save/cancel transitions for one profile form session.
//!
//! `SessionState` is an immutable value: every transition takes `&self` and
//! returns a fresh [`Transition`] holding the next state. Validation failures
//! never escape as errors; they stay on the state as per-field messages.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::dependencies::FieldDependencies;
use crate::core::rules::RuleSet;
use crate::core::types::{Field, FieldEdit, FieldError, Notification};
use crate::core::validator::{validate_after_change, validate_record};
use crate::record::ProfileRecord;

pub const SAVED_MESSAGE: &str = "Profile saved";

/// Whether the form is read-only or accepting edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Viewing,
    Editing,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Viewing => "viewing",
            Mode::Editing => "editing",
        }
    }
}

/// User intent applied to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    ToggleEdit,
    EditField { edit: FieldEdit },
    Save,
    Cancel,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ToggleEdit => "toggle_edit",
            Action::EditField { .. } => "edit_field",
            Action::Save => "save",
            Action::Cancel => "cancel",
        }
    }
}

/// Rules and cross-field graph a session validates with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub rules: RuleSet,
    pub dependencies: FieldDependencies,
}

impl Validation {
    pub fn new(rules: RuleSet, dependencies: FieldDependencies) -> Self {
        Self {
            rules,
            dependencies,
        }
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new(RuleSet::default(), FieldDependencies::standard())
    }
}

/// Snapshot of one form session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub mode: Mode,
    /// Last committed snapshot.
    pub committed: ProfileRecord,
    /// In-progress values; present only while editing.
    pub draft: Option<ProfileRecord>,
    /// Current per-field messages for the draft.
    pub errors: BTreeMap<Field, String>,
}

/// What a transition did, for logging and reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionSummary {
    pub action: &'static str,
    pub from: Mode,
    pub to: Mode,
    /// The action does not apply in the starting mode; state is unchanged.
    pub ignored: bool,
    /// True when a save replaced the committed snapshot.
    pub committed: bool,
}

/// Result of applying one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub notification: Option<Notification>,
    pub summary: TransitionSummary,
}

impl SessionState {
    /// Start a session in `Viewing`, seeded with `committed`.
    pub fn new(committed: ProfileRecord) -> Self {
        Self {
            mode: Mode::Viewing,
            committed,
            draft: None,
            errors: BTreeMap::new(),
        }
    }

    /// Errors as an ordered list.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.errors
            .iter()
            .map(|(field, message)| FieldError {
                field: *field,
                message: message.clone(),
            })
            .collect()
    }

    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// Apply `action`; `today` is the evaluation date for age rules.
    pub fn dispatch(&self, action: Action, validation: &Validation, today: NaiveDate) -> Transition {
        match action {
            Action::ToggleEdit => self.toggle_edit(),
            Action::EditField { edit } => self.edit_field(edit, validation, today),
            Action::Save => self.save(validation, today),
            Action::Cancel => self.cancel(),
        }
    }

    /// `Viewing -> Editing` seeds the draft; `Editing -> Viewing` discards it.
    pub fn toggle_edit(&self) -> Transition {
        match self.mode {
            Mode::Viewing => {
                let next = SessionState {
                    mode: Mode::Editing,
                    committed: self.committed.clone(),
                    draft: Some(self.committed.clone()),
                    errors: BTreeMap::new(),
                };
                self.transition("toggle_edit", next, None, false)
            }
            Mode::Editing => {
                let mut transition = self.cancel();
                transition.summary.action = "toggle_edit";
                transition
            }
        }
    }

    /// Apply one field edit to the draft and revalidate its dependents.
    pub fn edit_field(&self, edit: FieldEdit, validation: &Validation, today: NaiveDate) -> Transition {
        let Some(draft) = self.draft.as_ref().filter(|_| self.is_editing()) else {
            return self.ignored("edit_field");
        };
        let changed = edit.field();
        let draft = draft.with_edit(edit);
        // Checked as save will see it.
        let (checked, failures) = validate_after_change(
            &draft.normalized(),
            &validation.rules,
            &validation.dependencies,
            changed,
            today,
        );

        let mut errors = self.errors.clone();
        for field in checked {
            errors.remove(&field);
        }
        errors.extend(failures.into_iter().map(|err| (err.field, err.message)));

        let next = SessionState {
            mode: Mode::Editing,
            committed: self.committed.clone(),
            draft: Some(draft),
            errors,
        };
        self.transition("edit_field", next, None, false)
    }

    /// Validate the normalized draft and commit it if every rule passes.
    pub fn save(&self, validation: &Validation, today: NaiveDate) -> Transition {
        let Some(draft) = self.draft.as_ref().filter(|_| self.is_editing()) else {
            return self.ignored("save");
        };
        let candidate = draft.normalized();
        let failures = validate_record(&candidate, &validation.rules, today);

        if failures.is_empty() {
            let next = SessionState::new(candidate);
            let notification = Notification::Success(SAVED_MESSAGE.to_string());
            return self.transition("save", next, Some(notification), true);
        }

        let message = match failures.len() {
            1 => "Fix 1 field before saving".to_string(),
            count => format!("Fix {count} fields before saving"),
        };
        let next = SessionState {
            mode: Mode::Editing,
            committed: self.committed.clone(),
            draft: Some(draft.clone()),
            errors: failures
                .into_iter()
                .map(|err| (err.field, err.message))
                .collect(),
        };
        self.transition("save", next, Some(Notification::Failure(message)), false)
    }

    /// Discard the draft and return to the committed snapshot.
    pub fn cancel(&self) -> Transition {
        if !self.is_editing() {
            return self.ignored("cancel");
        }
        let next = SessionState::new(self.committed.clone());
        self.transition("cancel", next, None, false)
    }

    fn ignored(&self, action: &'static str) -> Transition {
        Transition {
            state: self.clone(),
            notification: None,
            summary: TransitionSummary {
                action,
                from: self.mode,
                to: self.mode,
                ignored: true,
                committed: false,
            },
        }
    }

    fn transition(
        &self,
        action: &'static str,
        next: SessionState,
        notification: Option<Notification>,
        committed: bool,
    ) -> Transition {
        let summary = TransitionSummary {
            action,
            from: self.mode,
            to: next.mode,
            ignored: false,
            committed,
        };
        Transition {
            state: next,
            notification,
            summary,
        }
    }
}
