use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::types::{Field, FieldEdit, FieldValue};

/// Fixed set of positions a profile may hold.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    ClientManager,
    SupportSpecialist,
    Director,
}

impl Position {
    pub const ALL: [Position; 3] = [
        Position::ClientManager,
        Position::SupportSpecialist,
        Position::Director,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Position::ClientManager => "client_manager",
            Position::SupportSpecialist => "support_specialist",
            Position::Director => "director",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Position::ClientManager => "Client relations manager",
            Position::SupportSpecialist => "Technical support specialist",
            Position::Director => "Director",
        }
    }

    /// Match either the key or the display label, ignoring ASCII case.
    pub fn parse(raw: &str) -> Option<Position> {
        let raw = raw.trim();
        Position::ALL.into_iter().find(|position| {
            position.key().eq_ignore_ascii_case(raw) || position.label().eq_ignore_ascii_case(raw)
        })
    }
}

/// Snapshot of every profile field at one point in time.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    pub full_name: String,
    pub birth_date: Option<NaiveDate>,
    pub experience: Option<u32>,
    pub position: Option<Position>,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub email: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ProfileRecord {
    /// Rule-facing view of one field.
    pub fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::FullName => FieldValue::Text(&self.full_name),
            Field::BirthDate => FieldValue::Date(self.birth_date),
            Field::Experience => FieldValue::Number(self.experience),
            Field::Position => FieldValue::Choice(self.position),
            Field::Username => FieldValue::Text(&self.username),
            Field::Password => FieldValue::Secret(self.password.as_deref().unwrap_or_default()),
            Field::Email => FieldValue::Text(&self.email),
            Field::PhoneNumber => FieldValue::Text(&self.phone_number),
            Field::Notes => FieldValue::Text(self.notes.as_deref().unwrap_or_default()),
        }
    }

    /// Return a copy with `edit` applied.
    pub fn with_edit(&self, edit: FieldEdit) -> ProfileRecord {
        let mut next = self.clone();
        match edit {
            FieldEdit::FullName(value) => next.full_name = value,
            FieldEdit::BirthDate(value) => next.birth_date = value,
            FieldEdit::Experience(value) => next.experience = value,
            FieldEdit::Position(value) => next.position = value,
            FieldEdit::Username(value) => next.username = value,
            FieldEdit::Password(value) => next.password = value,
            FieldEdit::Email(value) => next.email = value,
            FieldEdit::PhoneNumber(value) => next.phone_number = value,
            FieldEdit::Notes(value) => next.notes = value,
        }
        next
    }

    /// Trim text fields and drop empty optional text.
    ///
    /// Passwords are never trimmed; an empty password becomes absent.
    pub fn normalized(&self) -> ProfileRecord {
        ProfileRecord {
            full_name: self.full_name.trim().to_string(),
            birth_date: self.birth_date,
            experience: self.experience,
            position: self.position,
            username: self.username.trim().to_string(),
            password: self.password.clone().filter(|password| !password.is_empty()),
            email: self.email.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            notes: self
                .notes
                .as_deref()
                .map(str::trim)
                .filter(|notes| !notes.is_empty())
                .map(str::to_string),
        }
    }
}

/// Sample profile a fresh session starts from.
pub fn default_profile() -> ProfileRecord {
    ProfileRecord {
        full_name: "Ivanov Ivan Ivanovich".to_string(),
        birth_date: NaiveDate::from_ymd_opt(1990, 1, 1),
        experience: Some(10),
        position: Some(Position::ClientManager),
        username: "ivanov".to_string(),
        password: None,
        email: "ivanov@example.com".to_string(),
        phone_number: "+7 777 777 77 77".to_string(),
        notes: Some("This is a note.".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_trims_text_but_not_password() {
        let mut record = default_profile();
        record.full_name = "  Petrov Petr  ".to_string();
        record.email = " petrov@example.com\n".to_string();
        record.password = Some(" secret1 ".to_string());
        record.notes = Some("   ".to_string());

        let normalized = record.normalized();
        assert_eq!(normalized.full_name, "Petrov Petr");
        assert_eq!(normalized.email, "petrov@example.com");
        assert_eq!(normalized.password.as_deref(), Some(" secret1 "));
        assert_eq!(normalized.notes, None);
    }

    #[test]
    fn with_edit_replaces_only_target_field() {
        let record = default_profile();
        let next = record.with_edit(FieldEdit::Experience(Some(12)));
        assert_eq!(next.experience, Some(12));
        assert_eq!(next.full_name, record.full_name);
        assert_eq!(record.experience, Some(10));
    }

    #[test]
    fn position_parses_key_or_label() {
        assert_eq!(Position::parse("director"), Some(Position::Director));
        assert_eq!(
            Position::parse("technical support specialist"),
            Some(Position::SupportSpecialist)
        );
        assert_eq!(Position::parse("intern"), None);
    }

    /// Snapshot JSON uses camelCase keys and omits absent optional text.
    #[test]
    fn snapshot_json_shape_is_stable() {
        let json = serde_json::to_value(default_profile()).expect("serialize");
        assert_eq!(json["fullName"], "Ivanov Ivan Ivanovich");
        assert_eq!(json["birthDate"], "1990-01-01");
        assert_eq!(json["position"], "client_manager");
        assert!(json.get("password").is_none());
    }
}
