//! API route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, middleware::auth::auth_middleware};
use pesa_shared::AppError;

pub mod auth;
pub mod balances;
pub mod currencies;
pub mod health;
pub mod rates;
pub mod recipients;
pub mod transfers;

/// Creates the API router with protected routes that need state for middleware.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(balances::routes())
        .merge(currencies::routes())
        .merge(rates::routes())
        .merge(recipients::routes())
        .merge(transfers::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(protected_routes)
}

/// Renders an [`AppError`] as a JSON error response.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_maps_status_codes() {
        let unauthenticated = AppError::Unauthenticated("bad credentials".into());
        assert_eq!(
            error_response(&unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );

        let database = AppError::Database("connection lost".into());
        assert_eq!(
            error_response(&database).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        let upstream = AppError::ExternalService("provider down".into());
        assert_eq!(error_response(&upstream).status(), StatusCode::BAD_GATEWAY);
    }
}
