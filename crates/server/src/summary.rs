//! Spending rollups.

use api_types::{
    ApiResponse,
    expense::DateRangeQuery,
    summary::{CategorySpendingView, TotalSpending},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, auth::AuthUser, expenses::bounds, server::ServerState};

pub async fn total(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<TotalSpending>>, ServerError> {
    let total = state
        .engine
        .total_spending(user.id, &bounds(query))
        .await?;

    Ok(Json(ApiResponse::ok(TotalSpending {
        total: total.total.to_decimal(),
        count: total.count,
        start_date: total.range.map(|r| r.start),
        end_date: total.range.map(|r| r.end),
    })))
}

pub async fn by_category(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<DateRangeQuery>,
) -> Result<Json<ApiResponse<Vec<CategorySpendingView>>>, ServerError> {
    let categories = state
        .engine
        .spending_by_category(user.id, &bounds(query))
        .await?
        .into_iter()
        .map(|c| CategorySpendingView {
            type_id: c.type_id,
            category: c.category,
            total: c.total.to_decimal(),
            count: c.count,
        })
        .collect();

    Ok(Json(ApiResponse::list(categories)))
}
