//! Field validation for whitespace-delimited records
//! -------------------------------------------------
//! Ledger and index records are split on whitespace, so any value written into
//! them must be a single non-empty token.

use crate::error::{CmsError, CmsResult};

/// Validate a value destined for a whitespace-delimited record field.
pub fn validate_token(field: &'static str, value: &str) -> CmsResult<()> {
    if value.is_empty() {
        return Err(CmsError::invalid(field, "cannot be empty"));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(CmsError::invalid(field, "cannot contain whitespace"));
    }
    if value.chars().any(char::is_control) {
        return Err(CmsError::invalid(field, "cannot contain control characters"));
    }
    Ok(())
}
