use api_types::{ApiResponse, expense_type::ExpenseTypeView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<ExpenseTypeView>>>, ServerError> {
    let types = state
        .engine
        .list_expense_types()
        .await?
        .into_iter()
        .map(|t| ExpenseTypeView {
            id: t.id,
            name: t.name,
        })
        .collect();

    Ok(Json(ApiResponse::list(types)))
}
