//! Plain-text rendering of a profile snapshot.

use std::collections::BTreeMap;

use anyhow::Result;
use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::types::Field;
use crate::record::ProfileRecord;

const CARD_TEMPLATE: &str = include_str!("templates/card.txt");

#[derive(Debug, Clone, Serialize)]
struct CardRow {
    label: &'static str,
    value: String,
    error: Option<String>,
}

/// Render `record` as a labeled card, annotating fields that have errors.
pub fn render_card(
    title: &str,
    record: &ProfileRecord,
    errors: &BTreeMap<Field, String>,
) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("card", CARD_TEMPLATE)?;
    let rows: Vec<CardRow> = Field::ALL
        .into_iter()
        .map(|field| CardRow {
            label: field.label(),
            value: display_value(record, field),
            error: errors.get(&field).cloned(),
        })
        .collect();
    let rendered = env
        .get_template("card")?
        .render(context! { title => title, rows => rows })?;
    Ok(rendered)
}

fn display_value(record: &ProfileRecord, field: Field) -> String {
    let text = match field {
        Field::FullName => record.full_name.clone(),
        Field::BirthDate => record
            .birth_date
            .map(|date| date.format("%d.%m.%Y").to_string())
            .unwrap_or_default(),
        Field::Experience => record
            .experience
            .map(|years| years.to_string())
            .unwrap_or_default(),
        Field::Position => record
            .position
            .map(|position| position.label().to_string())
            .unwrap_or_default(),
        Field::Username => record.username.clone(),
        Field::Password => match record.password.as_deref() {
            Some(password) if !password.is_empty() => "*".repeat(password.chars().count()),
            _ => String::new(),
        },
        Field::Email => record.email.clone(),
        Field::PhoneNumber => record.phone_number.clone(),
        Field::Notes => record.notes.clone().unwrap_or_default(),
    };
    if text.is_empty() { "-".to_string() } else { text }
}
