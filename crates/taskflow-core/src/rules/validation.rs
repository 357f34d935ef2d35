//! Request field validation shared by every operation

use chrono::NaiveDate;

use crate::errors::{Result, TaskflowError};

/// Trim an optional field, treating blank as absent.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Require a non-blank field, returning it trimmed.
///
/// # Errors
/// `MissingField` when absent or whitespace-only.
pub fn require(field: &str, value: Option<String>) -> Result<String> {
    clean(value).ok_or_else(|| TaskflowError::MissingField {
        field: field.to_string(),
    })
}

/// Borrowing variant of [`require`] for query parameters.
///
/// # Errors
/// `MissingField` when absent or whitespace-only.
pub fn require_str<'a>(field: &str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(TaskflowError::MissingField {
            field: field.to_string(),
        }),
    }
}

/// Minimal structural e-mail check: one `@`, non-empty local part, a dot
/// in the domain, no whitespace. Returns the address lowercased.
///
/// # Errors
/// `InvalidField` on malformed input.
pub fn normalize_email(field: &str, value: &str) -> Result<String> {
    let email = value.trim().to_ascii_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(TaskflowError::InvalidField {
            field: field.to_string(),
            reason: "not a valid e-mail address".to_string(),
        })
    }
}

/// Parse an optional `YYYY-MM-DD` query parameter.
///
/// # Errors
/// `InvalidField` when present but unparseable.
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| TaskflowError::InvalidField {
                field: field.to_string(),
                reason: format!("expected YYYY-MM-DD, got `{raw}`"),
            }),
    }
}

/// Reject negative money amounts.
///
/// # Errors
/// `InvalidField` for negative or non-finite values.
pub fn non_negative_amount(field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(TaskflowError::InvalidField {
            field: field.to_string(),
            reason: "must be a non-negative number".to_string(),
        }),
        other => Ok(other),
    }
}
