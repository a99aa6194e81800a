//! Supported currency listing.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::routes::error_response;
use pesa_db::CurrencyRepository;
use pesa_shared::AppError;

/// Creates currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// GET /currencies - All currencies transfers may be denominated in.
async fn list_currencies(State(state): State<AppState>) -> impl IntoResponse {
    let repo = CurrencyRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(currencies) => {
            (StatusCode::OK, Json(json!({ "currencies": currencies }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list currencies");
            error_response(&AppError::Database(
                "An error occurred fetching currencies".to_string(),
            ))
        }
    }
}
