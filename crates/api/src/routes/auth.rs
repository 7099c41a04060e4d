//! Authentication routes for registration, login and the current profile.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{
    AppState,
    error::{error_response, internal_error},
    extract::ApiJson,
    middleware::AuthUser,
};
use ridebook_core::account::AccountService;
use ridebook_db::AccountRepository;
use ridebook_shared::auth::{LoginRequest, LoginResponse, RegisterRequest};

/// Public auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// Auth routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn account_service(state: &AppState) -> AccountService<AccountRepository> {
    AccountService::new(Arc::new(AccountRepository::new((*state.db).clone())))
}

/// POST /auth/register - Create an admin account for a new company.
async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Response {
    match account_service(&state).register(payload).await {
        Ok(account) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "User registered successfully",
                "user": account.view(),
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /auth/login - Verify credentials and issue a session token.
async fn login(State(state): State<AppState>, ApiJson(payload): ApiJson<LoginRequest>) -> Response {
    let account = match account_service(&state)
        .authenticate(&payload.email, &payload.password)
        .await
    {
        Ok(account) => account,
        Err(e) => return error_response(e),
    };

    let token = match state
        .jwt_service
        .issue_token(account.id, account.role.as_str())
    {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to issue session token");
            return internal_error();
        }
    };

    info!(account_id = %account.id, "Account logged in");

    Json(LoginResponse {
        token,
        role: account.role.to_string(),
        admin_id: account.id,
        first_name: account.first_name,
        last_name: account.last_name,
        company_name: account.company_name,
        expires_in: state.jwt_service.token_expires_in(),
    })
    .into_response()
}

/// GET /auth/me - Profile of the token subject.
async fn me(State(state): State<AppState>, auth: AuthUser) -> Response {
    match account_service(&state).profile(auth.account_id()).await {
        Ok(account) => Json(account.view()).into_response(),
        Err(e) => error_response(e),
    }
}
