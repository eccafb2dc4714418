use api_types::ApiResponse;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use std::{net::SocketAddr, sync::Arc};

use crate::{ServerError, auth, expense_types, expenses, summary, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub tokens: Arc<auth::TokenSigner>,
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Health>>, ServerError> {
    state.engine.ping().await?;
    Ok(Json(ApiResponse::ok(Health { status: "ok" })))
}

async fn fallback() -> ServerError {
    ServerError::NotFound("route not found".to_string())
}

pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(user::me))
        .route("/api/types", get(expense_types::list))
        .route("/api/expenses", get(expenses::list).post(expenses::create))
        .route("/api/expenses/search", get(expenses::search))
        .route("/api/expenses/filter/date", get(expenses::filter_by_date))
        .route(
            "/api/expenses/filter/type/{type_id}",
            get(expenses::filter_by_type),
        )
        .route("/api/expenses/summary/total", get(summary::total))
        .route("/api/expenses/summary/category", get(summary::by_category))
        .route(
            "/api/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(user::register))
        .route("/api/auth/login", post(user::login))
        .merge(protected)
        .fallback(fallback)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    tokens: auth::TokenSigner,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        tokens: Arc::new(tokens),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    tokens: auth::TokenSigner,
    listener: tokio::net::TcpListener,
) -> Result<SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, tokens, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

/// `201 Created` with the enveloped body.
pub(crate) fn created<T>(data: T, message: &str) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(data).with_message(message)),
    )
}
