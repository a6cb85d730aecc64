//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use shared::error::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Guest, employee and other person names
pub const MAX_NAME_LEN: usize = 200;

/// Notes, reasons, free text
pub const MAX_NOTE_LEN: usize = 500;

/// Phone numbers and short identifiers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        )
        .with_detail("field", field));
    }
    if value.chars().count() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.chars().count() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.chars().count()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Loose email shape check: one `@`, non-empty local part, dotted domain
pub fn validate_email(value: &str, field: &str) -> Result<(), AppError> {
    let invalid = || {
        AppError::with_message(ErrorCode::InvalidFormat, format!("{field} is not a valid email"))
            .with_detail("field", field)
    };
    if value.len() > MAX_EMAIL_LEN || value.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = value.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }
    Ok(())
}

/// Phone: digits with optional leading `+` and spaces / dashes, 6..=20 digits
pub fn validate_phone(value: &str, field: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
    if !allowed || !(6..=20).contains(&digits) {
        return Err(AppError::with_message(
            ErrorCode::InvalidFormat,
            format!("{field} is not a valid phone number"),
        )
        .with_detail("field", field));
    }
    Ok(())
}
