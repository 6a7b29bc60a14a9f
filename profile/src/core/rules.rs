//! Declarative per-field validation rules.
//!
//! Each rule is a pure check over one field value plus a [`RuleContext`] that
//! exposes sibling fields and the evaluation date. Rules carry their own
//! user-facing message.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::core::age::{age_in_years, oldest_allowed_birth_date};
use crate::core::types::{Field, FieldValue, RulePolicy};
use crate::record::ProfileRecord;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .unwrap()
});

// +7 XXX XXX XX XX, 10-digit local, or 11-digit full; spaces or hyphens optional.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:\+7|\d)[ -]?)?\d{3}[ -]?\d{3}[ -]?\d{2}[ -]?\d{2}$").unwrap()
});

/// Read access to the record under validation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub record: &'a ProfileRecord,
    pub today: NaiveDate,
}

impl<'a> RuleContext<'a> {
    pub fn new(record: &'a ProfileRecord, today: NaiveDate) -> Self {
        Self { record, today }
    }

    /// Current value of a sibling field.
    pub fn sibling(&self, field: Field) -> FieldValue<'a> {
        self.record.value(field)
    }
}

/// One validation predicate bound to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required {
        message: String,
    },
    MinLength {
        min: usize,
        message: String,
    },
    MaxLength {
        max: usize,
        message: String,
    },
    EmailFormat {
        message: String,
    },
    PhoneFormat {
        message: String,
    },
    /// Required date, not in the future, at most `max_age_years` ago.
    BirthDateValid {
        max_age_years: u32,
        required_message: String,
        future_message: String,
        too_old_message: String,
    },
    /// Optional years, capped absolutely and by the age from `birthDate`.
    ExperienceValid {
        max_years: u32,
        over_max_message: String,
        over_age_message: String,
    },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn max_length(max: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength {
            max,
            message: message.into(),
        }
    }

    pub fn email_format(message: impl Into<String>) -> Self {
        Rule::EmailFormat {
            message: message.into(),
        }
    }

    pub fn phone_format(message: impl Into<String>) -> Self {
        Rule::PhoneFormat {
            message: message.into(),
        }
    }

    /// Whether the rule still runs when the value is empty.
    fn checks_empty(&self) -> bool {
        matches!(self, Rule::Required { .. } | Rule::BirthDateValid { .. })
    }

    /// Evaluate the rule against `value`.
    pub fn check(&self, value: &FieldValue<'_>, ctx: &RuleContext<'_>) -> Result<(), String> {
        if value.is_empty() && !self.checks_empty() {
            return Ok(());
        }
        match self {
            Rule::Required { message } => fail_if(value.is_empty(), message),
            Rule::MinLength { min, message } => {
                fail_if(text_len(value).is_some_and(|len| len < *min), message)
            }
            Rule::MaxLength { max, message } => {
                fail_if(text_len(value).is_some_and(|len| len > *max), message)
            }
            Rule::EmailFormat { message } => fail_if(
                value.as_text().is_some_and(|text| !EMAIL_RE.is_match(text.trim())),
                message,
            ),
            Rule::PhoneFormat { message } => fail_if(
                value.as_text().is_some_and(|text| !PHONE_RE.is_match(text.trim())),
                message,
            ),
            Rule::BirthDateValid {
                max_age_years,
                required_message,
                future_message,
                too_old_message,
            } => {
                let FieldValue::Date(Some(birth)) = value else {
                    return Err(required_message.clone());
                };
                if *birth > ctx.today {
                    return Err(future_message.clone());
                }
                match oldest_allowed_birth_date(ctx.today, *max_age_years) {
                    Some(oldest) if *birth < oldest => Err(too_old_message.clone()),
                    _ => Ok(()),
                }
            }
            Rule::ExperienceValid {
                max_years,
                over_max_message,
                over_age_message,
            } => {
                let FieldValue::Number(Some(years)) = value else {
                    return Ok(());
                };
                if years > max_years {
                    return Err(over_max_message.clone());
                }
                let FieldValue::Date(Some(birth)) = ctx.sibling(Field::BirthDate) else {
                    return Ok(());
                };
                match age_in_years(birth, ctx.today) {
                    Some(age) if *years > age => Err(over_age_message.clone()),
                    _ => Ok(()),
                }
            }
        }
    }
}

fn fail_if(failed: bool, message: &str) -> Result<(), String> {
    if failed {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Character length of text values, `None` for non-text.
fn text_len(value: &FieldValue<'_>) -> Option<usize> {
    value.as_text().map(|text| text.chars().count())
}

/// Declarative rule lists per field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    rules: BTreeMap<Field, Vec<Rule>>,
}

impl RuleSet {
    /// Empty rule set; every field passes.
    pub fn empty() -> Self {
        Self {
            rules: BTreeMap::new(),
        }
    }

    /// Append `rule` to the list for `field`.
    pub fn with_rule(mut self, field: Field, rule: Rule) -> Self {
        self.rules.entry(field).or_default().push(rule);
        self
    }

    /// The profile form's rule set under `policy`.
    pub fn standard(policy: &RulePolicy) -> Self {
        let mut set = Self::empty()
            .with_rule(Field::FullName, Rule::required("Please enter the full name"))
            .with_rule(
                Field::BirthDate,
                Rule::BirthDateValid {
                    max_age_years: policy.max_age_years,
                    required_message: "Please select a birth date".to_string(),
                    future_message: "Birth date cannot be in the future".to_string(),
                    too_old_message: format!(
                        "Age cannot exceed {} years",
                        policy.max_age_years
                    ),
                },
            )
            .with_rule(
                Field::Experience,
                Rule::ExperienceValid {
                    max_years: policy.max_experience_years,
                    over_max_message: format!(
                        "Experience cannot exceed {} years",
                        policy.max_experience_years
                    ),
                    over_age_message: "Experience cannot exceed age".to_string(),
                },
            )
            .with_rule(Field::Position, Rule::required("Please select a position"))
            .with_rule(Field::Username, Rule::required("Please enter a username"))
            .with_rule(
                Field::Username,
                Rule::min_length(
                    policy.username_min,
                    format!(
                        "Username must be at least {} characters",
                        policy.username_min
                    ),
                ),
            )
            .with_rule(
                Field::Username,
                Rule::max_length(
                    policy.username_max,
                    format!(
                        "Username must be at most {} characters",
                        policy.username_max
                    ),
                ),
            )
            .with_rule(
                Field::Password,
                Rule::min_length(
                    policy.password_min,
                    format!(
                        "Password must be at least {} characters",
                        policy.password_min
                    ),
                ),
            )
            .with_rule(
                Field::Password,
                Rule::max_length(
                    policy.password_max,
                    format!(
                        "Password must be at most {} characters",
                        policy.password_max
                    ),
                ),
            )
            .with_rule(Field::Email, Rule::required("Please enter an email"))
            .with_rule(Field::Email, Rule::email_format("Invalid email format"));

        if policy.phone_required {
            set = set.with_rule(
                Field::PhoneNumber,
                Rule::required("Please enter a phone number"),
            );
        }
        set.with_rule(
            Field::PhoneNumber,
            Rule::phone_format("Invalid phone number format"),
        )
        .with_rule(
            Field::Notes,
            Rule::max_length(
                policy.notes_max,
                format!("Notes cannot exceed {} characters", policy.notes_max),
            ),
        )
    }

    /// Rules declared for `field`, in evaluation order.
    pub fn rules_for(&self, field: Field) -> &[Rule] {
        self.rules.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    /// First failing rule message for `field`, if any.
    pub fn check_field(&self, field: Field, ctx: &RuleContext<'_>) -> Result<(), String> {
        let value = ctx.sibling(field);
        self.rules_for(field)
            .iter()
            .try_for_each(|rule| rule.check(&value, ctx))
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard(&RulePolicy::default())
    }
}
