//! Form field coercion.
//!
//! Every form arrives as text. These helpers turn one field into a typed value
//! or a [`FieldError`] naming the field, so handlers can reject the whole
//! write before touching the store.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Date format produced by `<input type="date">`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Amounts must stay strictly below this magnitude (10^15).
///
/// Keeps `price * stock` and every running total well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldProblem {
    #[error("is required")]
    Missing,
    #[error("must be a number")]
    NotANumber,
    #[error("must be a whole number")]
    NotAWholeNumber,
    #[error("must not be negative")]
    Negative,
    #[error("must be at least 1")]
    Zero,
    #[error("is too large")]
    TooLarge,
    #[error("must be a date (YYYY-MM-DD)")]
    NotADate,
}

/// A rejected form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{field}: {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: &'static str, problem: FieldProblem) -> Self {
        Self { field, problem }
    }
}

/// Trimmed, non-empty text.
///
/// # Errors
///
/// Returns [`FieldProblem::Missing`] when nothing is left after trimming.
pub fn required_text(field: &'static str, value: &str) -> Result<String, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Missing));
    }
    Ok(trimmed.to_owned())
}

/// A decimal amount that may not be negative (prices, totals, salaries).
///
/// # Errors
///
/// Returns an error for blank, non-numeric, negative or oversized input.
pub fn amount(field: &'static str, value: &str) -> Result<Decimal, FieldError> {
    let parsed = signed_amount(field, value)?;
    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(FieldError::new(field, FieldProblem::Negative));
    }
    Ok(parsed.normalize())
}

/// A decimal that may be negative. Used by the calculator, which never stores
/// its inputs.
///
/// # Errors
///
/// Returns an error for blank, non-numeric or oversized input.
pub fn signed_amount(field: &'static str, value: &str) -> Result<Decimal, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Missing));
    }
    let parsed = Decimal::from_str(trimmed)
        .map_err(|_| FieldError::new(field, FieldProblem::NotANumber))?;
    if parsed.abs() >= MAX_AMOUNT {
        return Err(FieldError::new(field, FieldProblem::TooLarge));
    }
    Ok(parsed)
}

/// A whole number >= 0 (stock levels, thresholds).
///
/// # Errors
///
/// Returns an error for blank, fractional, negative or oversized input.
pub fn count(field: &'static str, value: &str) -> Result<u32, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Missing));
    }
    if let Ok(n) = trimmed.parse::<u32>() {
        return Ok(n);
    }
    match trimmed.parse::<i128>() {
        Ok(n) if n < 0 => Err(FieldError::new(field, FieldProblem::Negative)),
        Ok(_) => Err(FieldError::new(field, FieldProblem::TooLarge)),
        Err(_) if Decimal::from_str(trimmed).is_ok() => {
            Err(FieldError::new(field, FieldProblem::NotAWholeNumber))
        }
        Err(_) => Err(FieldError::new(field, FieldProblem::NotANumber)),
    }
}

/// Like [`count`], but blank input means zero.
///
/// # Errors
///
/// Same as [`count`] for non-blank input.
pub fn count_or_zero(field: &'static str, value: &str) -> Result<u32, FieldError> {
    if value.trim().is_empty() {
        return Ok(0);
    }
    count(field, value)
}

/// A whole number >= 1 (quantities).
///
/// # Errors
///
/// Same as [`count`], plus [`FieldProblem::Zero`] for `0`.
pub fn positive_count(field: &'static str, value: &str) -> Result<u32, FieldError> {
    match count(field, value)? {
        0 => Err(FieldError::new(field, FieldProblem::Zero)),
        n => Ok(n),
    }
}

/// A calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns an error for blank input or anything `chrono` cannot parse.
pub fn date(field: &'static str, value: &str) -> Result<NaiveDate, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::new(field, FieldProblem::Missing));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| FieldError::new(field, FieldProblem::NotADate))
}
