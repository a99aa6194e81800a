//! Authentication routes for login, register, and token refresh.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::json;
use tracing::{error, info};

use crate::AppState;
use crate::routes::error_response;
use pesa_core::auth::{hash_password, verify_password};
use pesa_db::UserRepository;
use pesa_shared::AppError;
use pesa_shared::auth::{LoginRequest, LoginResponse, RefreshRequest, RegisterRequest, UserInfo};

/// Creates the auth router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/refresh", post(refresh))
}

/// POST /auth/login - Authenticate user and return tokens.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Find user by email
    let user = match user_repo.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent user");
            return error_response(&AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return error_response(&AppError::Database(
                "An error occurred during login".to_string(),
            ));
        }
    };

    // Verify password
    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return error_response(&AppError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return error_response(&AppError::Internal(
                "An error occurred during login".to_string(),
            ));
        }
    }

    let tokens = match generate_token_pair(&state, user.id, &user.email) {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(user_id = %user.id, "User logged in successfully");

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        },
        access_token: tokens.0,
        refresh_token: tokens.1,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

/// POST /auth/register - Register a new user and credit the signup bonus.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let user_repo = UserRepository::new((*state.db).clone());

    // Check if email already exists
    match user_repo.email_exists(&payload.email).await {
        Ok(true) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "email_exists",
                    "message": "User with this email address already exists"
                })),
            )
                .into_response();
        }
        Ok(false) => {}
        Err(e) => {
            error!(error = %e, "Database error checking email");
            return error_response(&AppError::Database(
                "An error occurred during registration".to_string(),
            ));
        }
    }

    // Hash password
    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return error_response(&AppError::Internal(
                "An error occurred during registration".to_string(),
            ));
        }
    };

    // Create the account and its welcome credit in one transaction
    let (user, bonus) = match user_repo
        .create_with_bonus(&payload.email, &password_hash, &payload.full_name)
        .await
    {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to create user");
            return error_response(&AppError::Database(
                "An error occurred during registration".to_string(),
            ));
        }
    };

    info!(
        user_id = %user.id,
        email = %user.email,
        reference = %bonus.reference,
        "New user registered with signup bonus"
    );

    let tokens = match generate_token_pair(&state, user.id, &user.email) {
        Ok(t) => t,
        Err(response) => return response,
    };

    let response = LoginResponse {
        user: UserInfo {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
        },
        access_token: tokens.0,
        refresh_token: tokens.1,
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    (StatusCode::CREATED, Json(response)).into_response()
}

/// POST /auth/refresh - Refresh access token using refresh token.
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    // Validate refresh token
    let claims = match state.jwt_service.validate_token(&payload.refresh_token) {
        Ok(c) => c,
        Err(e) => {
            let (error, message) = match e {
                pesa_shared::JwtError::Expired => ("token_expired", "Refresh token has expired"),
                _ => ("invalid_token", "Invalid refresh token"),
            };
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": error, "message": message })),
            )
                .into_response();
        }
    };

    // Generate new access token
    let access_token = match state
        .jwt_service
        .generate_access_token(claims.user_id(), &claims.email)
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to generate access token");
            return error_response(&AppError::Internal(
                "An error occurred during token refresh".to_string(),
            ));
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "access_token": access_token,
            "expires_in": state.jwt_service.access_token_expires_in()
        })),
    )
        .into_response()
}

/// Generates an access and refresh token pair, or an error response.
fn generate_token_pair(
    state: &AppState,
    user_id: i64,
    email: &str,
) -> Result<(String, String), axum::response::Response> {
    let access_token = state
        .jwt_service
        .generate_access_token(user_id, email)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            internal_auth_error()
        })?;

    let refresh_token = state
        .jwt_service
        .generate_refresh_token(user_id, email)
        .map_err(|e| {
            error!(error = %e, "Failed to generate refresh token");
            internal_auth_error()
        })?;

    Ok((access_token, refresh_token))
}

fn internal_auth_error() -> axum::response::Response {
    error_response(&AppError::Internal(
        "An error occurred during authentication".to_string(),
    ))
}
