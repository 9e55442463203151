//! Field checks shared by the entity validators.
//!
//! Lengths are counted in Unicode scalar values, matching how the
//! database counts `VARCHAR` length.

use crate::error::{DomainError, Result};

/// Maximum length of identifiers and short text fields.
pub const MAX_SHORT_TEXT: usize = 128;

/// Checks that `value` is not empty.
pub fn require(value: &str, field: &'static str) -> Result<()> {
    if value.is_empty() {
        return Err(DomainError::Empty { field });
    }
    Ok(())
}

/// Checks that `value` does not exceed `max` characters.
pub fn at_most(value: &str, max: usize, field: &'static str) -> Result<()> {
    if value.chars().count() > max {
        return Err(DomainError::TooLong { field, max });
    }
    Ok(())
}

/// Checks that `value` is neither empty nor longer than `max`.
pub fn bounded(value: &str, max: usize, field: &'static str) -> Result<()> {
    require(value, field)?;
    at_most(value, max, field)
}

/// Checks that `value` is not negative.
pub fn non_negative(value: i64, field: &'static str) -> Result<()> {
    if value < 0 {
        return Err(DomainError::NegativeValue { field });
    }
    Ok(())
}

/// Checks that `value` is strictly positive. Zero is treated as absent.
pub fn positive(value: i64, field: &'static str) -> Result<()> {
    non_negative(value, field)?;
    if value == 0 {
        return Err(DomainError::Empty { field });
    }
    Ok(())
}
