use serde::{Deserialize, Serialize};

/// Envelope wrapping every successful response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items, for list responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(data.len()),
            data,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    /// Request fields that were missing or malformed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

pub mod auth {
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use super::*;

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Register {
        pub name: Option<String>,
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct Login {
        pub email: Option<String>,
        pub password: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub name: String,
        pub email: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Session {
        pub user: UserView,
        /// Bearer token for the `Authorization` header.
        pub token: String,
    }
}

pub mod expense_type {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseTypeView {
        pub id: i32,
        pub name: String,
    }
}

pub mod expense {
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    /// Body for creating or replacing an expense.
    ///
    /// There is deliberately no owner field: the owner is the authenticated
    /// caller.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseWrite {
        pub type_id: Option<i32>,
        /// Major units as a JSON number or string, e.g. `12.5`. Must be > 0
        /// with at most two decimal places.
        pub amount: Option<Decimal>,
        pub description: Option<String>,
        /// `YYYY-MM-DD`
        pub date: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub user_id: Uuid,
        pub type_id: i32,
        #[serde(rename = "type")]
        pub type_name: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub amount: Decimal,
        pub description: Option<String>,
        pub date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    /// Query string for date-bounded requests. Both or neither.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DateRangeQuery {
        pub start_date: Option<String>,
        pub end_date: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct SearchQuery {
        pub term: Option<String>,
    }
}

pub mod summary {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TotalSpending {
        #[serde(with = "rust_decimal::serde::float")]
        pub total: Decimal,
        pub count: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub start_date: Option<NaiveDate>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub type_id: i32,
        pub category: String,
        #[serde(with = "rust_decimal::serde::float")]
        pub total: Decimal,
        pub count: u64,
    }
}
