//! Role gate smoke-test endpoints.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::AppState;

/// `GET /protected/admin`, behind the admin gate.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/protected/admin", get(welcome_admin))
}

/// `GET /protected/superadmin`, behind the superadmin gate.
pub fn superadmin_routes() -> Router<AppState> {
    Router::new().route("/protected/superadmin", get(welcome_superadmin))
}

async fn welcome_admin() -> Json<Value> {
    Json(json!({ "message": "Welcome Admin!" }))
}

async fn welcome_superadmin() -> Json<Value> {
    Json(json!({ "message": "Welcome Superadmin!" }))
}
