//! Transfer creation and history endpoints.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tracing::{error, info, warn};

use crate::routes::error_response;
use crate::{AppState, middleware::AuthUser};
use pesa_core::ledger::{LedgerError, TransferRequest};
use pesa_db::{CurrencyRepository, TransactionRepository};
use pesa_shared::AppError;

/// Creates transfer routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/transfers", post(create_transfer).get(list_transfers))
}

/// POST /transfers - Move value from the caller to another account.
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<TransferRequest>,
) -> impl IntoResponse {
    let currency_repo = CurrencyRepository::new((*state.db).clone());
    let transaction_repo = TransactionRepository::new((*state.db).clone());

    let currencies = match currency_repo.codes().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load currency codes");
            return error_response(&AppError::Database(
                "An error occurred creating the transfer".to_string(),
            ));
        }
    };

    match transaction_repo
        .create_transfer(auth.user_id(), &payload, &currencies)
        .await
    {
        Ok(outcome) => {
            info!(
                reference = %outcome.transaction.reference,
                sender_id = auth.user_id(),
                receiver_id = payload.receiver_id,
                "Transfer created"
            );

            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "Transaction successful",
                    "transaction": outcome.transaction,
                    "balances": outcome.balances,
                })),
            )
                .into_response()
        }
        Err(e) => ledger_error_response(&e, auth.user_id()),
    }
}

/// GET /transfers - The caller's transaction history, most recent first.
async fn list_transfers(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = TransactionRepository::new((*state.db).clone());

    match repo.list_for_account(auth.user_id()).await {
        Ok(transactions) => {
            (StatusCode::OK, Json(json!({ "transactions": transactions }))).into_response()
        }
        Err(e) => {
            error!(error = %e, user_id = auth.user_id(), "Failed to list transactions");
            error_response(&AppError::Database(
                "An error occurred fetching transactions".to_string(),
            ))
        }
    }
}

/// Maps a ledger error to an HTTP response, logging server-side failures.
fn ledger_error_response(e: &LedgerError, sender_id: i64) -> axum::response::Response {
    let status = StatusCode::from_u16(e.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if status.is_server_error() {
        error!(error = %e, sender_id, "Transfer failed");
    } else {
        warn!(error = %e, sender_id, "Transfer rejected");
    }

    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}
