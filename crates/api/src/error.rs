//! Mapping from domain errors to HTTP responses.
//!
//! Every error body has the shape `{"error": <code>, "message": <text>}`.
//! Server-side failures are logged with their detail and answered with a
//! generic message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use ridebook_core::{
    account::AccountError, booking::BookingError, catalog::CatalogError, routing::RoutingError,
};
use ridebook_shared::AppError;

/// A domain error with a stable API code.
pub trait ApiError: Into<AppError> {
    /// Snake-case code for the `error` field.
    fn code(&self) -> &'static str;
}

impl ApiError for AccountError {
    fn code(&self) -> &'static str {
        AccountError::code(self)
    }
}

impl ApiError for CatalogError {
    fn code(&self) -> &'static str {
        CatalogError::code(self)
    }
}

impl ApiError for BookingError {
    fn code(&self) -> &'static str {
        BookingError::code(self)
    }
}

impl ApiError for RoutingError {
    fn code(&self) -> &'static str {
        RoutingError::code(self)
    }
}

/// Builds the `{error, message}` response for a domain error.
pub fn error_response<E: ApiError>(err: E) -> Response {
    let code = err.code();
    let app: AppError = err.into();

    let status = StatusCode::from_u16(app.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %app, code, "request failed");
    }

    json_error(status, code, &app.public_message())
}

/// Builds an `{error, message}` response.
pub fn json_error(status: StatusCode, code: &str, message: &str) -> Response {
    (status, Json(json!({ "error": code, "message": message }))).into_response()
}

/// Response for failures outside any domain (token signing and the like).
pub fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "An error occurred",
    )
}
