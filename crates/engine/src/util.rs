//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation rejects bad input the same way.

use chrono::NaiveDate;

use crate::{EngineError, ResultEngine};

/// Calendar dates are exchanged as ISO-8601 `YYYY-MM-DD`.
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim a free-text value, mapping blank input to `None`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Trim a required value, mapping blank input to `None` so callers can report
/// it as missing.
pub(crate) fn required_text(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a calendar date supplied for `field`.
pub(crate) fn parse_date(field: &str, value: &str) -> ResultEngine<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| EngineError::invalid(field, "expected a date formatted as YYYY-MM-DD"))
}

/// Case folding shared by stored descriptions and search terms.
pub(crate) fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Escape character declared on every `LIKE` built by the engine.
pub(crate) const LIKE_ESCAPE: char = '!';

/// Escape `LIKE` wildcards so a search term is matched literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
