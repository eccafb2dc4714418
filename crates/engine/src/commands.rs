//! Command structs for engine write operations.
//!
//! Inputs arrive as the caller sent them (every field optional, dates as
//! strings) and are validated here, so that a missing or malformed field is
//! always reported by name. None of them carries an owner: the owner of an
//! expense is the authenticated caller passed to the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::{
    EngineError, MoneyCents, ResultEngine,
    util::{fold_case, normalize_optional_text, parse_date, required_text},
};

/// Fields for creating an expense or replacing all of its editable fields.
#[derive(Clone, Debug, Default)]
pub struct ExpenseInput {
    pub type_id: Option<i32>,
    /// Major units, at most two decimal places.
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
}

impl ExpenseInput {
    #[must_use]
    pub fn new(type_id: i32, amount_cents: i64, date: impl Into<String>) -> Self {
        Self {
            type_id: Some(type_id),
            amount: Some(MoneyCents::new(amount_cents).to_decimal()),
            description: None,
            date: Some(date.into()),
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(crate) fn validate(&self) -> ResultEngine<ExpenseFields> {
        let date = required_text(self.date.as_deref());

        let mut missing = Vec::new();
        if self.type_id.is_none() {
            missing.push("type_id");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        if date.is_none() {
            missing.push("date");
        }

        let (Some(type_id), Some(amount), Some(date)) = (self.type_id, self.amount, date) else {
            return Err(EngineError::missing(missing));
        };

        let amount = MoneyCents::from_decimal(amount)
            .ok_or_else(|| EngineError::invalid("amount", "must have at most two decimal places"))?;
        if !amount.is_positive() {
            return Err(EngineError::invalid("amount", "must be > 0"));
        }
        if amount > MoneyCents::MAX_EXPENSE {
            return Err(EngineError::invalid(
                "amount",
                format!("must not exceed {}", MoneyCents::MAX_EXPENSE),
            ));
        }

        Ok(ExpenseFields {
            type_id,
            amount,
            description: normalize_optional_text(self.description.as_deref()),
            date: parse_date("date", date)?,
        })
    }
}

/// Validated form of [`ExpenseInput`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ExpenseFields {
    pub(crate) type_id: i32,
    pub(crate) amount: MoneyCents,
    pub(crate) description: Option<String>,
    pub(crate) date: NaiveDate,
}

impl ExpenseFields {
    pub(crate) fn description_folded(&self) -> Option<String> {
        self.description.as_deref().map(fold_case)
    }
}

/// Register a user. The password must already be hashed by the caller.
#[derive(Clone, Debug, Default)]
pub struct NewUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: String,
}

impl NewUser {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            password_hash: password_hash.into(),
        }
    }

    pub(crate) fn validate(&self) -> ResultEngine<(String, String)> {
        let name = required_text(self.name.as_deref());
        let email = required_text(self.email.as_deref());

        let (Some(name), Some(email)) = (name, email) else {
            let mut missing = Vec::new();
            if name.is_none() {
                missing.push("name");
            }
            if email.is_none() {
                missing.push("email");
            }
            return Err(EngineError::missing(missing));
        };

        if !email.contains('@') {
            return Err(EngineError::invalid("email", "must be an email address"));
        }
        if self.password_hash.is_empty() {
            return Err(EngineError::missing(["password"]));
        }

        Ok((name.to_string(), normalize_email(email)))
    }
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
