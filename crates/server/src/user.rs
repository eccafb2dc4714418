//! Registration, login and the current user.

use api_types::{
    ApiResponse,
    auth::{Login, Register, Session, UserView},
};
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{EngineError, NewUser, User};

use crate::{
    ServerError,
    auth::{self, AuthError, AuthUser, MIN_PASSWORD_LENGTH},
    json_body,
    server::{ServerState, created},
};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        name: user.name,
        email: user.email,
        created_at: user.created_at,
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn session(state: &ServerState, user: User) -> Result<Session, AuthError> {
    let token = state.tokens.issue(user.id, &user.email)?;
    Ok(Session {
        user: user_view(user),
        token,
    })
}

pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<Register>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Session>>), ServerError> {
    let payload = json_body(payload)?;

    let missing: Vec<String> = [
        ("name", present(payload.name.as_deref())),
        ("email", present(payload.email.as_deref())),
        ("password", payload.password.as_deref().filter(|p| !p.is_empty())),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_none())
    .map(|(field, _)| field.to_string())
    .collect();
    if !missing.is_empty() {
        return Err(EngineError::MissingFields(missing).into());
    }

    let password = payload.password.unwrap_or_default();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(EngineError::InvalidField {
            field: "password".to_string(),
            reason: format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
        }
        .into());
    }

    let password_hash = auth::hash_password(password).await?;
    let user = state
        .engine
        .create_user(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
        })
        .await?;
    tracing::info!("registered user {}", user.id);

    Ok(created(session(&state, user)?, "user registered"))
}

pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<Login>, JsonRejection>,
) -> Result<Json<ApiResponse<Session>>, ServerError> {
    let payload = json_body(payload)?;

    let (Some(email), Some(password)) = (
        present(payload.email.as_deref()),
        payload.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        let mut missing = Vec::new();
        if present(payload.email.as_deref()).is_none() {
            missing.push("email".to_string());
        }
        if payload.password.as_deref().is_none_or(str::is_empty) {
            missing.push("password".to_string());
        }
        return Err(EngineError::MissingFields(missing).into());
    };

    let Some((user, hash)) = state.engine.user_credentials_by_email(email).await? else {
        return Err(AuthError::InvalidCredentials.into());
    };
    auth::verify_password(password.to_string(), hash).await?;

    Ok(Json(
        ApiResponse::ok(session(&state, user)?).with_message("login successful"),
    ))
}

pub async fn me(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<UserView>>, ServerError> {
    let user = state.engine.user_by_id(auth.id).await?;
    Ok(Json(ApiResponse::ok(user_view(user))))
}
