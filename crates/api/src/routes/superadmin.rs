//! Superadmin account management.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{ApiJson, ApiPath},
};
use ridebook_core::account::AccountService;
use ridebook_db::AccountRepository;
use ridebook_shared::auth::{UpdateUserRequest, UserSummary};

/// Creates the superadmin routes. The caller applies the role gate.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/superadmin/users", get(list_users))
        .route("/superadmin/users/{id}", put(update_user))
}

fn account_service(state: &AppState) -> AccountService<AccountRepository> {
    AccountService::new(Arc::new(AccountRepository::new((*state.db).clone())))
}

/// GET /superadmin/users - Every account as `{id, email, role}`.
async fn list_users(State(state): State<AppState>) -> Response {
    match account_service(&state).list_accounts().await {
        Ok(accounts) => {
            let users: Vec<UserSummary> = accounts.iter().map(|a| a.summary()).collect();
            Json(users).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// PUT /superadmin/users/{id} - Change an account's email and/or role.
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateUserRequest>,
) -> Response {
    match account_service(&state).update_account(id, payload).await {
        Ok(account) => Json(account.view()).into_response(),
        Err(e) => error_response(e),
    }
}
