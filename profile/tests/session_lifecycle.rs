//! Lifecycle tests driving one form session through many transitions.
//!
//! These tests exercise the reducer end to end: edit mode toggling, cross-field
//! revalidation, failed and successful saves, and cancel.

use profile::core::session::{Action, Mode, SAVED_MESSAGE, SessionState, Validation};
use profile::core::types::{Field, FieldEdit, Notification};
use profile::record::default_profile;
use profile::test_support::{date, fixed_today};

fn apply(state: &SessionState, action: Action) -> SessionState {
    state
        .dispatch(action, &Validation::default(), fixed_today())
        .state
}

fn edit(edit: FieldEdit) -> Action {
    Action::EditField { edit }
}

/// Full lifecycle: edit -> failed save -> fix -> save -> edit -> cancel.
///
/// 1. Toggle edit, set birth date so age is 50, set experience 51.
/// 2. Save fails on experience only; committed snapshot untouched.
/// 3. Lower experience to 50; error clears on edit.
/// 4. Save commits and returns to viewing.
/// 5. Edit again, change username, cancel: the step-4 snapshot survives.
#[test]
fn full_lifecycle_commits_once_and_reverts_on_cancel() {
    let validation = Validation::default();
    let initial = SessionState::new(default_profile());

    let state = apply(&initial, Action::ToggleEdit);
    let state = apply(&state, edit(FieldEdit::BirthDate(Some(date(1976, 10, 18)))));
    let state = apply(&state, edit(FieldEdit::Experience(Some(51))));
    assert_eq!(
        state.errors.get(&Field::Experience).map(String::as_str),
        Some("Experience cannot exceed age")
    );

    let failed = state.dispatch(Action::Save, &validation, fixed_today());
    assert_eq!(failed.state.mode, Mode::Editing);
    assert_eq!(failed.state.committed, default_profile());
    assert_eq!(failed.state.errors.len(), 1);

    let state = apply(&failed.state, edit(FieldEdit::Experience(Some(50))));
    assert!(state.errors.is_empty());

    let saved = state.dispatch(Action::Save, &validation, fixed_today());
    assert_eq!(saved.state.mode, Mode::Viewing);
    assert_eq!(
        saved.notification,
        Some(Notification::Success(SAVED_MESSAGE.to_string()))
    );
    assert_eq!(saved.state.committed.experience, Some(50));
    assert_eq!(saved.state.committed.birth_date, Some(date(1976, 10, 18)));

    let committed = saved.state.committed.clone();
    let state = apply(&saved.state, Action::ToggleEdit);
    let state = apply(&state, edit(FieldEdit::Username("changed".to_string())));
    let state = apply(&state, Action::Cancel);
    assert_eq!(state, SessionState::new(committed));
}

/// Each single-rule violation yields exactly one message for the broken field.
#[test]
fn single_violation_reports_exactly_that_rule() {
    let cases = [
        (FieldEdit::FullName("   ".to_string()), Field::FullName, "Please enter the full name"),
        (FieldEdit::BirthDate(None), Field::BirthDate, "Please select a birth date"),
        (FieldEdit::Position(None), Field::Position, "Please select a position"),
        (
            FieldEdit::Username("a".repeat(21)),
            Field::Username,
            "Username must be at most 20 characters",
        ),
        (
            FieldEdit::Password(Some("short".to_string())),
            Field::Password,
            "Password must be at least 6 characters",
        ),
        (FieldEdit::Email("nope".to_string()), Field::Email, "Invalid email format"),
        (
            FieldEdit::PhoneNumber("12345".to_string()),
            Field::PhoneNumber,
            "Invalid phone number format",
        ),
        (
            FieldEdit::PhoneNumber(String::new()),
            Field::PhoneNumber,
            "Please enter a phone number",
        ),
    ];

    for (field_edit, field, message) in cases {
        let state = apply(&SessionState::new(default_profile()), Action::ToggleEdit);
        let state = apply(&state, edit(field_edit));
        let saved = apply(&state, Action::Save);
        assert_eq!(saved.mode, Mode::Editing, "{field}");
        let errors = saved.field_errors();
        assert_eq!(errors.len(), 1, "{field}: {errors:?}");
        assert_eq!(errors[0].field, field);
        assert_eq!(errors[0].message, message);
    }
}

#[test]
fn toggling_twice_without_saving_keeps_original() {
    let initial = SessionState::new(default_profile());
    let state = apply(&initial, Action::ToggleEdit);
    let state = apply(&state, edit(FieldEdit::Notes(Some("draft".to_string()))));
    let state = apply(&state, Action::ToggleEdit);
    assert_eq!(state, initial);
}
