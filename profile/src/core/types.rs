//! Shared deterministic types for profile core logic.
//!
//! These types define stable contracts between the rule interpreter, the
//! session reducer and the outer surfaces. They must not depend on external
//! state or I/O.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::Position;

/// Profile form fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    BirthDate,
    Experience,
    Position,
    Username,
    Password,
    Email,
    PhoneNumber,
    Notes,
}

impl Field {
    /// All fields in form order.
    pub const ALL: [Field; 9] = [
        Field::FullName,
        Field::BirthDate,
        Field::Experience,
        Field::Position,
        Field::Username,
        Field::Password,
        Field::Email,
        Field::PhoneNumber,
        Field::Notes,
    ];

    /// Stable camelCase key, matching the snapshot JSON.
    pub fn key(self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::BirthDate => "birthDate",
            Field::Experience => "experience",
            Field::Position => "position",
            Field::Username => "username",
            Field::Password => "password",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Notes => "notes",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FullName => "Full name",
            Field::BirthDate => "Birth date",
            Field::Experience => "Experience (years)",
            Field::Position => "Position",
            Field::Username => "Username",
            Field::Password => "Password",
            Field::Email => "Email",
            Field::PhoneNumber => "Phone number",
            Field::Notes => "Notes",
        }
    }

    /// Parse a camelCase key (snake_case and kebab-case are accepted too).
    pub fn parse_key(raw: &str) -> Option<Field> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        Field::ALL
            .into_iter()
            .find(|field| field.key().to_lowercase() == normalized)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Read-only view of one field's current value, as seen by rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    /// Text that is never trimmed; only a zero-length value is empty.
    Secret(&'a str),
    Date(Option<NaiveDate>),
    Number(Option<u32>),
    Choice(Option<Position>),
}

impl FieldValue<'_> {
    /// True when the value counts as "not filled in".
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.trim().is_empty(),
            FieldValue::Secret(text) => text.is_empty(),
            FieldValue::Date(date) => date.is_none(),
            FieldValue::Number(number) => number.is_none(),
            FieldValue::Choice(choice) => choice.is_none(),
        }
    }

    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) | FieldValue::Secret(text) => Some(text),
            _ => None,
        }
    }
}

/// A typed single-field edit applied to a draft snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FieldEdit {
    FullName(String),
    BirthDate(Option<NaiveDate>),
    Experience(Option<u32>),
    Position(Option<Position>),
    Username(String),
    Password(Option<String>),
    Email(String),
    PhoneNumber(String),
    Notes(Option<String>),
}

impl FieldEdit {
    /// The field this edit targets.
    pub fn field(&self) -> Field {
        match self {
            FieldEdit::FullName(_) => Field::FullName,
            FieldEdit::BirthDate(_) => Field::BirthDate,
            FieldEdit::Experience(_) => Field::Experience,
            FieldEdit::Position(_) => Field::Position,
            FieldEdit::Username(_) => Field::Username,
            FieldEdit::Password(_) => Field::Password,
            FieldEdit::Email(_) => Field::Email,
            FieldEdit::PhoneNumber(_) => Field::PhoneNumber,
            FieldEdit::Notes(_) => Field::Notes,
        }
    }

    /// Parse raw input text into a typed edit.
    ///
    /// An empty string clears optional fields. Dates accept `YYYY-MM-DD` and
    /// `DD.MM.YYYY`. Errors describe malformed input and are not validation
    /// failures.
    pub fn parse(field: Field, raw: &str) -> Result<FieldEdit, String> {
        let trimmed = raw.trim();
        let optional_text = || (!raw.is_empty()).then(|| raw.to_string());
        let edit = match field {
            Field::FullName => FieldEdit::FullName(raw.to_string()),
            Field::BirthDate => FieldEdit::BirthDate(parse_optional_date(trimmed)?),
            Field::Experience => {
                if trimmed.is_empty() {
                    FieldEdit::Experience(None)
                } else {
                    let years = trimmed.parse::<u32>().map_err(|_| {
                        format!("experience must be a non-negative whole number, got '{trimmed}'")
                    })?;
                    FieldEdit::Experience(Some(years))
                }
            }
            Field::Position => {
                if trimmed.is_empty() {
                    FieldEdit::Position(None)
                } else {
                    let position = Position::parse(trimmed)
                        .ok_or_else(|| format!("unknown position '{trimmed}'"))?;
                    FieldEdit::Position(Some(position))
                }
            }
            Field::Username => FieldEdit::Username(raw.to_string()),
            Field::Password => FieldEdit::Password(optional_text()),
            Field::Email => FieldEdit::Email(raw.to_string()),
            Field::PhoneNumber => FieldEdit::PhoneNumber(raw.to_string()),
            Field::Notes => FieldEdit::Notes(optional_text()),
        };
        Ok(edit)
    }
}

/// Parse `YYYY-MM-DD` or `DD.MM.YYYY`; empty input yields `None`.
pub fn parse_optional_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d.%m.%Y"))
        .map(Some)
        .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD or DD.MM.YYYY)"))
}

/// A single user-correctable validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Signal sent to the notification surface after a save attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum Notification {
    Success(String),
    Failure(String),
}

impl Notification {
    pub fn message(&self) -> &str {
        match self {
            Notification::Success(message) | Notification::Failure(message) => message,
        }
    }
}

/// Tunable bounds for the standard rule set.
///
/// Missing fields default to the values the profile form has always used.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RulePolicy {
    /// Whether an empty phone number is rejected.
    pub phone_required: bool,
    /// Oldest accepted age, in whole calendar years.
    pub max_age_years: u32,
    pub max_experience_years: u32,
    pub username_min: usize,
    pub username_max: usize,
    pub password_min: usize,
    pub password_max: usize,
    pub notes_max: usize,
}

impl Default for RulePolicy {
    fn default() -> Self {
        Self {
            phone_required: true,
            max_age_years: 130,
            max_experience_years: 100,
            username_min: 3,
            username_max: 20,
            password_min: 6,
            password_max: 12,
            notes_max: 400,
        }
    }
}
