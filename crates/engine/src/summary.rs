//! Spending rollups returned by the aggregation queries.

use serde::{Deserialize, Serialize};

use crate::{DateRange, MoneyCents};

/// Sum of a user's expenses, optionally limited to a date range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingTotal {
    /// Zero when nothing matched.
    pub total: MoneyCents,
    pub count: u64,
    pub range: Option<DateRange>,
}

/// Spending for one expense type.
///
/// Only produced for types with at least one matching expense.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpending {
    pub type_id: i32,
    pub category: String,
    pub total: MoneyCents,
    pub count: u64,
}
