//! Rule interpreter over whole records.

use chrono::NaiveDate;

use crate::core::dependencies::FieldDependencies;
use crate::core::rules::{RuleContext, RuleSet};
use crate::core::types::{Field, FieldError};
use crate::record::ProfileRecord;

/// Validate every field in form order.
///
/// An empty result means the record may be committed.
pub fn validate_record(record: &ProfileRecord, rules: &RuleSet, today: NaiveDate) -> Vec<FieldError> {
    validate_fields(record, rules, &Field::ALL, today)
}

/// Validate only `fields`, preserving their order.
pub fn validate_fields(
    record: &ProfileRecord,
    rules: &RuleSet,
    fields: &[Field],
    today: NaiveDate,
) -> Vec<FieldError> {
    let ctx = RuleContext::new(record, today);
    fields
        .iter()
        .filter_map(|&field| {
            rules
                .check_field(field, &ctx)
                .err()
                .map(|message| FieldError { field, message })
        })
        .collect()
}

/// Validate `changed` and every field that depends on it.
///
/// Returns the fields that were checked alongside the failures, so callers
/// can clear stale messages for fields that now pass.
pub fn validate_after_change(
    record: &ProfileRecord,
    rules: &RuleSet,
    deps: &FieldDependencies,
    changed: Field,
    today: NaiveDate,
) -> (Vec<Field>, Vec<FieldError>) {
    let checked = deps.revalidation_set(changed);
    let errors = validate_fields(record, rules, &checked, today);
    (checked, errors)
}
