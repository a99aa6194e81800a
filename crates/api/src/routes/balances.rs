//! Per-currency balance endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::routes::error_response;
use crate::{AppState, middleware::AuthUser};
use pesa_db::TransactionRepository;
use pesa_shared::AppError;

/// Creates balance routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/balances", get(get_balances))
}

/// GET /balances - Per-currency credit, debit, and net for the caller.
async fn get_balances(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.balances(auth.user_id()).await {
        Ok(sheet) => {
            let balances: Vec<_> = sheet
                .iter()
                .map(|(currency, balance)| {
                    json!({
                        "currency": currency,
                        "credit": balance.credit,
                        "debit": balance.debit,
                        "available": balance.net(),
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!({ "balances": balances }))).into_response()
        }
        Err(e) => {
            error!(error = %e, user_id = auth.user_id(), "Failed to compute balances");
            error_response(&AppError::Database(
                "An error occurred fetching balances".to_string(),
            ))
        }
    }
}
