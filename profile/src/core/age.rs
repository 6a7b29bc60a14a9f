//! Calendar age arithmetic.

use chrono::{Months, NaiveDate};

/// Whole years between `birth` and `today`, floored.
///
/// Returns `None` when `birth` is after `today`.
pub fn age_in_years(birth: NaiveDate, today: NaiveDate) -> Option<u32> {
    today.years_since(birth)
}

/// Earliest birth date still within `max_age_years` of `today`.
///
/// February 29 clamps to February 28 in non-leap target years.
pub fn oldest_allowed_birth_date(today: NaiveDate, max_age_years: u32) -> Option<NaiveDate> {
    let months = max_age_years.checked_mul(12)?;
    today.checked_sub_months(Months::new(months))
}
