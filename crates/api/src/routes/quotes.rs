//! Route quotes: driving distance, duration and per-product prices.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use crate::{
    AppState,
    error::error_response,
    extract::{ApiPath, ApiQuery},
};
use ridebook_core::catalog::CatalogService;
use ridebook_db::ProductRepository;

/// Creates the quote routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/routes/{company_name}/quote", get(quote))
}

/// Query string of a quote request. Places are names or `lng,lat` pairs.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuoteQuery {
    /// Origin.
    pub from: String,
    /// Destination.
    pub to: String,
}

/// GET /routes/{companyName}/quote?from=..&to=..
///
/// Upstream failures still answer 200 with `"N/A"` figures and base prices.
async fn quote(
    State(state): State<AppState>,
    ApiPath(company_name): ApiPath<String>,
    ApiQuery(query): ApiQuery<QuoteQuery>,
) -> Response {
    let catalog = CatalogService::new(
        state.images.clone(),
        Arc::new(ProductRepository::new((*state.db).clone())),
    );

    let products = match catalog.list_by_company(&company_name).await {
        Ok(products) => products,
        Err(e) => return error_response(e),
    };

    match state.routing.quote(&query.from, &query.to, products).await {
        Ok(quote) => Json(quote).into_response(),
        Err(e) => error_response(e),
    }
}
