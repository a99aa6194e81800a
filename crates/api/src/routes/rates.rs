//! Exchange-rate proxy.
//!
//! Fetches live quotes from the upstream provider and trims the result to
//! the currencies this service supports. The returned rates are advisory;
//! the client echoes its chosen rate back when creating a transfer and the
//! ledger verifies the legs agree with it.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;
use crate::routes::error_response;
use pesa_db::CurrencyRepository;
use pesa_shared::AppError;

/// Creates exchange-rate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/rates", get(get_rates))
}

/// Query parameters for the rates endpoint.
#[derive(Debug, Deserialize)]
pub struct RatesQuery {
    /// Currency the quotes are expressed against. Defaults to USD.
    #[serde(default = "default_base")]
    pub base_currency: String,
}

fn default_base() -> String {
    "USD".to_string()
}

/// Provider response envelope.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    data: BTreeMap<String, Decimal>,
}

/// GET /rates - Live exchange rates for the supported currencies.
async fn get_rates(
    State(state): State<AppState>,
    Query(query): Query<RatesQuery>,
) -> impl IntoResponse {
    let currency_repo = CurrencyRepository::new((*state.db).clone());

    let supported = match currency_repo.codes().await {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to load currency codes");
            return error_response(&AppError::Database(
                "An error occurred fetching exchange rates".to_string(),
            ));
        }
    };

    if !supported.contains(&query.base_currency) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_CURRENCY",
                "message": format!("Unsupported base currency: {}", query.base_currency)
            })),
        )
            .into_response();
    }

    let response = state
        .rates
        .http
        .get(&state.rates.config.api_url)
        .query(&[
            ("apikey", state.rates.config.api_key.as_str()),
            ("base_currency", query.base_currency.as_str()),
        ])
        .send()
        .await;

    let provider: ProviderResponse = match response {
        Ok(res) if res.status().is_success() => match res.json().await {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "Malformed response from rates provider");
                return rates_unavailable();
            }
        },
        Ok(res) => {
            error!(status = %res.status(), "Rates provider returned an error");
            return rates_unavailable();
        }
        Err(e) => {
            error!(error = %e, "Failed to reach rates provider");
            return rates_unavailable();
        }
    };

    let rates: BTreeMap<&String, &Decimal> = provider
        .data
        .iter()
        .filter(|(code, _)| supported.contains(code.as_str()))
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "base_currency": query.base_currency,
            "rates": rates,
        })),
    )
        .into_response()
}

fn rates_unavailable() -> axum::response::Response {
    error_response(&AppError::ExternalService(
        "Exchange rates are temporarily unavailable".to_string(),
    ))
}
