//! `profile import`: commit a server-sourced profile through an edit session.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::core::types::FieldEdit;
use crate::edit::{EditOutcome, run_edit};
use crate::io::server_data::load_server_profile;
use crate::record::ProfileRecord;

/// One edit per field, replacing the whole draft with `record`.
pub fn record_edits(record: ProfileRecord) -> Vec<FieldEdit> {
    vec![
        FieldEdit::FullName(record.full_name),
        FieldEdit::BirthDate(record.birth_date),
        FieldEdit::Experience(record.experience),
        FieldEdit::Position(record.position),
        FieldEdit::Username(record.username),
        FieldEdit::Password(record.password),
        FieldEdit::Email(record.email),
        FieldEdit::PhoneNumber(record.phone_number),
        FieldEdit::Notes(record.notes),
    ]
}

/// Map `server_path` and save it as the committed snapshot if it validates.
pub fn import_server_profile(root: &Path, server_path: &Path, today: NaiveDate) -> Result<EditOutcome> {
    let record = load_server_profile(server_path).context("load server profile")?;
    run_edit(root, record_edits(record), false, today)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::types::Field;
    use crate::record::Position;
    use crate::test_support::{TestProject, date, fixed_today};

    fn write_server(project: &TestProject, body: &str) -> std::path::PathBuf {
        let path = project.path().join("server.json");
        fs::write(&path, body).expect("write server json");
        path
    }

    #[test]
    fn import_commits_valid_server_profile() {
        let project = TestProject::new().expect("project");
        let path = write_server(
            &project,
            r#"{"fullName":" Sidorov Sidor ","birthDate":"1985-03-04T10:00:00Z","experience":15,
                "position":"Director","username":"sidorov","email":"sidorov@example.com",
                "phoneNumber":"9001234567"}"#,
        );

        let outcome = import_server_profile(project.path(), &path, fixed_today()).expect("import");
        assert!(matches!(outcome, EditOutcome::Saved { .. }), "{outcome:?}");

        let stored = project.read_profile().expect("read");
        assert_eq!(stored.full_name, "Sidorov Sidor");
        assert_eq!(stored.birth_date, Some(date(1985, 3, 4)));
        assert_eq!(stored.position, Some(Position::Director));
        assert_eq!(stored.notes, None);
    }

    /// Experience above age is caught by the same rules as interactive edits.
    #[test]
    fn import_rejects_experience_above_age() {
        let project = TestProject::new().expect("project");
        let path = write_server(
            &project,
            r#"{"fullName":"Young","birthDate":"2010-01-01","experience":20,
                "position":"director","username":"young","email":"young@example.com",
                "phoneNumber":"9001234567"}"#,
        );

        let outcome = import_server_profile(project.path(), &path, fixed_today()).expect("import");
        let EditOutcome::Rejected { errors, .. } = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, Field::Experience);
    }
}
