//! Inclusive calendar date ranges used by filters and aggregations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine,
    util::{parse_date, required_text},
};

/// Raw date bounds as supplied by a caller, before validation.
///
/// Both bounds are `YYYY-MM-DD` strings. They form an all-or-nothing pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl DateBounds {
    /// No bounds at all.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn between(start_date: impl Into<String>, end_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
        }
    }

    /// Both bounds must be present.
    pub(crate) fn require(&self) -> ResultEngine<DateRange> {
        self.resolve()?
            .ok_or_else(|| EngineError::missing(["start_date", "end_date"]))
    }

    /// Either both bounds or neither. A lone bound is rejected, naming the
    /// missing one.
    pub(crate) fn resolve(&self) -> ResultEngine<Option<DateRange>> {
        let start = required_text(self.start_date.as_deref());
        let end = required_text(self.end_date.as_deref());
        match (start, end) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(EngineError::missing(["end_date"])),
            (None, Some(_)) => Err(EngineError::missing(["start_date"])),
            (Some(start), Some(end)) => {
                let start = parse_date("start_date", start)?;
                let end = parse_date("end_date", end)?;
                DateRange::new(start, end).map(Some)
            }
        }
    }
}

/// A validated inclusive range `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> ResultEngine<Self> {
        if start > end {
            return Err(EngineError::invalid(
                "end_date",
                "must not be before start_date",
            ));
        }
        Ok(Self { start, end })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn no_bounds_resolves_to_none() {
        assert_eq!(DateBounds::unbounded().resolve().unwrap(), None);
    }

    #[test]
    fn lone_bound_is_rejected() {
        let only_start = DateBounds {
            start_date: Some("2024-01-01".to_string()),
            end_date: None,
        };
        assert_eq!(
            only_start.resolve().unwrap_err(),
            EngineError::MissingFields(vec!["end_date".to_string()])
        );

        let only_end = DateBounds {
            start_date: Some("  ".to_string()),
            end_date: Some("2024-01-31".to_string()),
        };
        assert_eq!(
            only_end.resolve().unwrap_err(),
            EngineError::MissingFields(vec!["start_date".to_string()])
        );
    }

    #[test]
    fn require_names_both_bounds() {
        let err = DateBounds::unbounded().require().unwrap_err();
        assert_eq!(err.fields(), vec!["start_date", "end_date"]);
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateBounds::between("2024-02-01", "2024-01-01")
            .require()
            .unwrap_err();
        assert_eq!(err.fields(), vec!["end_date"]);
    }

    #[test]
    fn range_is_inclusive() {
        let range = DateBounds::between("2024-01-01", "2024-01-31")
            .require()
            .unwrap();
        assert!(range.contains(ymd(2024, 1, 1)));
        assert!(range.contains(ymd(2024, 1, 31)));
        assert!(!range.contains(ymd(2024, 2, 1)));
    }
}
