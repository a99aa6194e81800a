//! Recipient listing for the transfer form.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde_json::json;
use tracing::error;

use crate::routes::error_response;
use crate::{AppState, middleware::AuthUser};
use pesa_db::UserRepository;
use pesa_shared::AppError;

/// Creates recipient routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/recipients", get(list_recipients))
}

/// GET /recipients - Every account the caller can send to.
async fn list_recipients(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = UserRepository::new((*state.db).clone());

    match repo.list_recipients(auth.user_id()).await {
        Ok(users) => {
            let recipients: Vec<_> = users
                .into_iter()
                .map(|u| {
                    json!({
                        "id": u.id,
                        "email": u.email,
                        "full_name": u.full_name,
                    })
                })
                .collect();

            (StatusCode::OK, Json(json!({ "recipients": recipients }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list recipients");
            error_response(&AppError::Database(
                "An error occurred fetching recipients".to_string(),
            ))
        }
    }
}
