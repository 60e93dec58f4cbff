//! Internal helpers for input validation and normalization.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every entry point enforces the same invariants.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a zero-padded `YYYY-MM-DD` calendar day.
///
/// Round-trips the parsed value so `2024-5-1` is rejected: stored dates must
/// stay lexicographically sortable.
pub(crate) fn parse_date(value: &str) -> ResultEngine<NaiveDate> {
    let trimmed = value.trim();
    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| EngineError::InvalidDate(format!("expected YYYY-MM-DD, got '{trimmed}'")))?;
    if date.format(DATE_FORMAT).to_string() != trimmed {
        return Err(EngineError::InvalidDate(format!(
            "expected YYYY-MM-DD, got '{trimmed}'"
        )));
    }
    Ok(date)
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!("{label} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_requires_zero_padding() {
        assert!(parse_date("2024-05-01").is_ok());
        assert!(parse_date("2024-5-1").is_err());
        assert!(parse_date("2024-02-30").is_err());
        assert!(parse_date("yesterday").is_err());
    }
}
