//! Expense API endpoints

use api_types::{
    ApiResponse,
    expense::{DateRangeQuery, ExpenseView, ExpenseWrite, SearchQuery},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use engine::{DateBounds, EngineError, Expense, ExpenseInput};
use uuid::Uuid;

use crate::{
    ServerError,
    auth::AuthUser,
    json_body,
    server::{ServerState, created},
};

pub(crate) fn expense_view(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id,
        user_id: expense.user_id,
        type_id: expense.type_id,
        type_name: expense.type_name,
        amount: expense.amount.to_decimal(),
        description: expense.description,
        date: expense.date,
        created_at: expense.created_at,
    }
}

fn list_response(expenses: Vec<Expense>) -> Json<ApiResponse<Vec<ExpenseView>>> {
    Json(ApiResponse::list(
        expenses.into_iter().map(expense_view).collect(),
    ))
}

fn input(payload: ExpenseWrite) -> ExpenseInput {
    ExpenseInput {
        type_id: payload.type_id,
        amount: payload.amount,
        description: payload.description,
        date: payload.date,
    }
}

pub(crate) fn bounds(query: DateRangeQuery) -> DateBounds {
    DateBounds {
        start_date: query.start_date,
        end_date: query.end_date,
    }
}

/// A malformed id cannot name an expense the caller owns.
fn expense_id(raw: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::NotFound("expense".to_string()).into())
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<ExpenseView>>>, ServerError> {
    let expenses = state.engine.list_all(user.id).await?;
    Ok(list_response(expenses))
}

pub async fn get(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExpenseView>>, ServerError> {
    let expense = state.engine.get_by_id(user.id, expense_id(&id)?).await?;
    Ok(Json(ApiResponse::ok(expense_view(expense))))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    payload: Result<Json<ExpenseWrite>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ExpenseView>>), ServerError> {
    let payload = json_body(payload)?;
    let expense = state.engine.create(user.id, input(payload)).await?;
    Ok(created(expense_view(expense), "expense created"))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Result<Json<ExpenseWrite>, JsonRejection>,
) -> Result<Json<ApiResponse<ExpenseView>>, ServerError> {
    let id = expense_id(&id)?;
    let payload = json_body(payload)?;
    let expense = state.engine.update(user.id, id, input(payload)).await?;
    Ok(Json(
        ApiResponse::ok(expense_view(expense)).with_message("expense updated"),
    ))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ExpenseView>>, ServerError> {
    let expense = state.engine.delete(user.id, expense_id(&id)?).await?;
    Ok(Json(
        ApiResponse::ok(expense_view(expense)).with_message("expense deleted"),
    ))
}

pub async fn filter_by_date(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<Vec<ExpenseView>>>, ServerError> {
    let expenses = state
        .engine
        .filter_by_date_range(user.id, &bounds(query))
        .await?;
    Ok(list_response(expenses))
}

pub async fn filter_by_type(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(type_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<ExpenseView>>>, ServerError> {
    let type_id: i32 = type_id.parse().map_err(|_| EngineError::InvalidField {
        field: "type_id".to_string(),
        reason: "must be an integer".to_string(),
    })?;
    let expenses = state.engine.filter_by_type(user.id, type_id).await?;
    Ok(list_response(expenses))
}

pub async fn search(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ExpenseView>>>, ServerError> {
    let expenses = state
        .engine
        .search(user.id, query.term.as_deref())
        .await?;
    Ok(list_response(expenses))
}
