//! Booking ledger routes. None of them require a token; company-scoped
//! routes only match bookings of the company in the path.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::error_response,
    extract::{ApiJson, ApiPath},
};
use ridebook_core::booking::{BookingRequest, BookingService};
use ridebook_db::BookingRepository;

/// Creates the booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings/book/{company_name}", post(create_booking))
        .route("/bookings/booked-dates/{company_name}", get(booked_dates))
        .route("/bookings/status/{id}", patch(patch_status))
        .route("/bookings/{company_name}", get(list_bookings))
        .route(
            "/bookings/{company_name}/status/{status}",
            get(list_by_status),
        )
        .route(
            "/bookings/{company_name}/{id}",
            put(update_booking).delete(delete_booking),
        )
        .route("/bookings/{company_name}/{id}/status", put(set_status))
}

/// Body of the status endpoints.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    /// `Pending`, `Confirmed` or `Cancelled`.
    pub status: String,
}

fn booking_service(state: &AppState) -> BookingService<BookingRepository> {
    BookingService::new(
        Arc::new(BookingRepository::new((*state.db).clone())),
        state.booking_policy,
    )
}

/// POST /bookings/book/{companyName} - Submit a booking; always `Pending`.
async fn create_booking(
    State(state): State<AppState>,
    ApiPath(company_name): ApiPath<String>,
    ApiJson(payload): ApiJson<BookingRequest>,
) -> Response {
    match booking_service(&state).create(&company_name, payload).await {
        Ok(booking) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Booking created successfully!",
                "booking": booking,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /bookings/{companyName}
async fn list_bookings(
    State(state): State<AppState>,
    ApiPath(company_name): ApiPath<String>,
) -> Response {
    match booking_service(&state).list(&company_name).await {
        Ok(bookings) => Json(bookings).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /bookings/{companyName}/status/{status}
async fn list_by_status(
    State(state): State<AppState>,
    ApiPath((company_name, status)): ApiPath<(String, String)>,
) -> Response {
    match booking_service(&state)
        .list_by_status(&company_name, &status)
        .await
    {
        Ok(bookings) => Json(bookings).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /bookings/booked-dates/{companyName} - Ranges held by active bookings.
async fn booked_dates(
    State(state): State<AppState>,
    ApiPath(company_name): ApiPath<String>,
) -> Response {
    match booking_service(&state).booked_dates(&company_name).await {
        Ok(ranges) => Json(ranges).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /bookings/{companyName}/{id}/status
async fn set_status(
    State(state): State<AppState>,
    ApiPath((company_name, id)): ApiPath<(String, Uuid)>,
    ApiJson(payload): ApiJson<StatusRequest>,
) -> Response {
    match booking_service(&state)
        .set_status(Some(&company_name), id, &payload.status)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(e) => error_response(e),
    }
}

/// PATCH /bookings/status/{id}
async fn patch_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<StatusRequest>,
) -> Response {
    match booking_service(&state)
        .set_status(None, id, &payload.status)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /bookings/{companyName}/{id} - Change customer fields.
async fn update_booking(
    State(state): State<AppState>,
    ApiPath((company_name, id)): ApiPath<(String, Uuid)>,
    ApiJson(payload): ApiJson<BookingRequest>,
) -> Response {
    match booking_service(&state)
        .update(&company_name, id, payload)
        .await
    {
        Ok(booking) => Json(booking).into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /bookings/{companyName}/{id}
async fn delete_booking(
    State(state): State<AppState>,
    ApiPath((company_name, id)): ApiPath<(String, Uuid)>,
) -> Response {
    match booking_service(&state).delete(&company_name, id).await {
        Ok(()) => Json(json!({ "message": "Booking deleted successfully" })).into_response(),
        Err(e) => error_response(e),
    }
}
