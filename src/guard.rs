//! Conditional field updates: write a value only where the service shows
//! none.
//!
//! Bots must never overwrite data an editor has already entered. Each helper
//! reads the control from the freshly loaded form first and reports
//! [`Guard::AlreadySet`] instead of writing when it holds a value.

use crate::fields::FieldValue;
use crate::form::HtmlForm;
use crate::types::PartialDate;
use crate::Result;

/// Decision of a conditional update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// The field was empty and now holds the new value.
    Written,
    /// The field already held a value; nothing was written.
    AlreadySet { field: String },
}

impl Guard {
    pub fn is_written(&self) -> bool {
        matches!(self, Guard::Written)
    }
}

/// Whether a control's value list counts as unset.
///
/// Text controls are unset when empty. Selectors are unset when they select
/// the empty placeholder option (`[""]`) or nothing at all.
pub fn is_unset(values: &[String]) -> bool {
    match values {
        [] => true,
        [only] => only.is_empty(),
        _ => false,
    }
}

/// Write `value` into `key` unless the control already holds something.
pub fn set_if_unset(form: &mut HtmlForm, key: &str, value: FieldValue) -> Result<Guard> {
    let current = form.get(key)?;
    if !is_unset(&current) {
        log::info!("{key} already set to {current:?}, not changing");
        return Ok(Guard::AlreadySet {
            field: key.to_string(),
        });
    }
    form.set(key, value)?;
    Ok(Guard::Written)
}

/// Write a partial date into the `<prefix>.year/.month/.day` controls unless
/// a year is already present.
///
/// Only the year is checked. The month is written when given, the day only
/// when both month and day are given; a day without a month is dropped. A
/// zero month or day counts as not given.
pub fn set_date_if_unset(form: &mut HtmlForm, prefix: &str, date: &PartialDate) -> Result<Guard> {
    let year_key = format!("{prefix}.year");
    let current_year = form.value(&year_key)?;
    if !current_year.is_empty() {
        log::info!("{year_key} already set to {current_year:?}, not changing");
        return Ok(Guard::AlreadySet { field: year_key });
    }

    form.set(&year_key, date.year.to_string())?;
    if let Some(month) = date.month.filter(|month| *month != 0) {
        form.set(&format!("{prefix}.month"), month.to_string())?;
        if let Some(day) = date.day.filter(|day| *day != 0) {
            form.set(&format!("{prefix}.day"), day.to_string())?;
        }
    }
    Ok(Guard::Written)
}
