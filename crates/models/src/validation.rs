//! Shape validation shared by every model.
//!
//! Deserialization only guarantees that a payload has the right field types and
//! that discriminators carry a known label. The checks here cover the rest of
//! the implied invariants: time windows, day-of-week range, money fields,
//! discount bounds, deposit/balance consistency and PIN format.
//!
//! Nothing is validated implicitly. Callers run [`Validate::validate`] when a
//! payload crosses a trust boundary.

use chrono::NaiveTime;
use thiserror::Error;

/// Tolerance used when comparing money amounts (one cent).
pub const MONEY_EPSILON: f64 = 0.01;

/// Default number of digits in a reservation PIN.
pub const DEFAULT_PIN_LENGTH: usize = 4;

/// A violated constraint on a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {constraint}")]
pub struct ValidationError {
    /// Wire name of the offending field (`horaInicio`, `customerData.email`, ...).
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    /// Prefix the field with the name of the enclosing object.
    pub fn nested(self, parent: &str) -> Self {
        Self {
            field: format!("{parent}.{}", self.field),
            constraint: self.constraint,
        }
    }
}

/// Tunable bounds for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationLimits {
    /// Exact number of ASCII digits a PIN must have.
    pub pin_length: usize,
    /// Largest accepted party size; `None` disables the upper bound.
    pub max_party_size: Option<u32>,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            pin_length: DEFAULT_PIN_LENGTH,
            max_party_size: None,
        }
    }
}

/// Implemented by every shape that carries invariants beyond its field types.
pub trait Validate {
    fn validate(&self, limits: &ValidationLimits) -> Result<(), ValidationError>;
}

// --- Field checks ---

pub fn non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be blank"));
    }
    Ok(())
}

/// Parse a local time of day. `HH:MM` is the canonical form; `HH:MM:SS` is accepted.
pub fn parse_time_of_day(field: &str, value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ValidationError::new(field, format!("'{value}' is not a time of day (HH:MM)")))
}

/// A start/end pair must parse and must not be empty.
///
/// An end earlier than the start is a window that runs past midnight.
pub fn time_window(
    (start_field, start): (&str, &str),
    (end_field, end): (&str, &str),
) -> Result<(), ValidationError> {
    let from = parse_time_of_day(start_field, start)?;
    let to = parse_time_of_day(end_field, end)?;
    if from == to {
        return Err(ValidationError::new(
            end_field,
            format!("must differ from {start_field} ({start})"),
        ));
    }
    Ok(())
}

pub fn money(field: &str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "must be a finite amount"));
    }
    if value < 0.0 {
        return Err(ValidationError::new(field, format!("must not be negative (got {value})")));
    }
    Ok(())
}

/// Day of week as used by availability rules: 0 = Sunday through 6 = Saturday.
pub fn day_of_week(field: &str, value: u8) -> Result<(), ValidationError> {
    if value > 6 {
        return Err(ValidationError::new(field, format!("must be between 0 and 6 (got {value})")));
    }
    Ok(())
}

pub fn party_size(field: &str, value: u32, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if value == 0 {
        return Err(ValidationError::new(field, "must be at least 1"));
    }
    if let Some(max) = limits.max_party_size {
        if value > max {
            return Err(ValidationError::new(field, format!("must not exceed {max} (got {value})")));
        }
    }
    Ok(())
}

pub fn pin(field: &str, value: &str, limits: &ValidationLimits) -> Result<(), ValidationError> {
    if value.is_empty()
        || value.len() != limits.pin_length
        || !value.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(ValidationError::new(
            field,
            format!("must be exactly {} digits", limits.pin_length),
        ));
    }
    Ok(())
}

/// Loose address check: one `@` with something on each side.
pub fn email(field: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::new(field, format!("'{value}' is not an email address"));
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || value.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

pub fn phone(field: &str, value: &str) -> Result<(), ValidationError> {
    non_blank(field, value)?;
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')' | '.');
    if !value.chars().all(allowed) || !value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new(field, format!("'{value}' is not a phone number")));
    }
    Ok(())
}

/// Instagram handle, with or without the leading `@`.
pub fn instagram(field: &str, value: &str) -> Result<(), ValidationError> {
    let handle = value.strip_prefix('@').unwrap_or(value);
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '.' || c == '_';
    if handle.is_empty() || handle.len() > 30 || !handle.chars().all(allowed) {
        return Err(ValidationError::new(field, format!("'{value}' is not an Instagram handle")));
    }
    Ok(())
}

/// Optional text fields are allowed to be empty; a value that is present and
/// non-blank must pass `check`.
pub fn optional(
    field: &str,
    value: Option<&str>,
    check: fn(&str, &str) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => check(field, v),
        _ => Ok(()),
    }
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= MONEY_EPSILON + f64::EPSILON * a.abs().max(b.abs())
}
