use api_types::ErrorResponse;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use engine::{EngineError, ErrorKind};

pub use auth::{
    AuthError, AuthUser, MAX_TOKEN_TTL_DAYS, TokenSigner, hash_password, verify_password,
};
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};

mod auth;
mod expense_types;
mod expenses;
mod server;
mod summary;
mod user;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{Login, Register, Session, UserView};
    }

    pub mod expense {
        pub use api_types::expense::{DateRangeQuery, ExpenseView, ExpenseWrite, SearchQuery};
    }

    pub mod expense_type {
        pub use api_types::expense_type::ExpenseTypeView;
    }

    pub mod summary {
        pub use api_types::summary::{CategorySpendingView, TotalSpending};
    }

    pub use api_types::{ApiResponse, ErrorResponse};
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Auth(AuthError),
    BadRequest(String),
    NotFound(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err.kind() {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: &EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

fn status_for_auth_error(err: &AuthError) -> StatusCode {
    match err {
        AuthError::PasswordHash | AuthError::Signing => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::UNAUTHORIZED,
    }
}

fn message_for_auth_error(err: &AuthError) -> String {
    match err {
        AuthError::PasswordHash | AuthError::Signing => {
            tracing::error!("auth failure: {err}");
            "internal server error".to_string()
        }
        other => {
            tracing::warn!("rejected request: {other}");
            other.to_string()
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message, fields) = match self {
            ServerError::Engine(err) => (
                status_for_engine_error(&err),
                message_for_engine_error(&err),
                err.fields(),
            ),
            ServerError::Auth(err) => (
                status_for_auth_error(&err),
                message_for_auth_error(&err),
                Vec::new(),
            ),
            ServerError::BadRequest(err) => (StatusCode::BAD_REQUEST, err, Vec::new()),
            ServerError::NotFound(err) => (StatusCode::NOT_FOUND, err, Vec::new()),
        };

        let body = ErrorResponse {
            success: false,
            message,
            fields,
        };
        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<AuthError> for ServerError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

/// Unwrap a JSON body, turning axum's plain-text rejection into our envelope.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ServerError> {
    let Json(value) = payload?;
    Ok(value)
}
