//! The module contains the errors the engine can return.
//!
//! Every variant maps to one [`ErrorKind`], which is what the request layer
//! uses to choose a response:
//!
//! - [`MissingFields`] and [`InvalidField`] are caller mistakes
//!   ([`ErrorKind::Validation`]).
//! - [`NotFound`] is returned when no row *owned by the caller* matches. It
//!   never tells apart "does not exist" from "belongs to someone else".
//! - [`ExistingKey`] is returned when a unique value is already taken.
//! - [`Database`] wraps any store fault. Its detail must not reach untrusted
//!   callers.
//!
//!  [`MissingFields`]: EngineError::MissingFields
//!  [`InvalidField`]: EngineError::InvalidField
//!  [`NotFound`]: EngineError::NotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("invalid {field}: {reason}")]
    InvalidField { field: String, reason: String },
    #[error("{0} not found")]
    NotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Store,
}

impl EngineError {
    pub(crate) fn missing<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields(fields.into_iter().map(Into::into).collect())
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingFields(_) | Self::InvalidField { .. } => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ExistingKey(_) => ErrorKind::Conflict,
            Self::Database(_) => ErrorKind::Store,
        }
    }

    /// Names of the request fields responsible for a validation error.
    pub fn fields(&self) -> Vec<String> {
        match self {
            Self::MissingFields(fields) => fields.clone(),
            Self::InvalidField { field, .. } => vec![field.clone()],
            _ => Vec::new(),
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::MissingFields(a), Self::MissingFields(b)) => a == b,
            (
                Self::InvalidField {
                    field: fa,
                    reason: ra,
                },
                Self::InvalidField {
                    field: fb,
                    reason: rb,
                },
            ) => fa == fb && ra == rb,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
