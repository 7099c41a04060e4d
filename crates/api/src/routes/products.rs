//! Product catalog routes. Forms are `multipart/form-data` with repeated
//! `images` file parts.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    error::{error_response, json_error},
    extract::ApiPath,
    middleware::AuthUser,
};
use ridebook_core::catalog::{CatalogService, ProductInput};
use ridebook_core::storage::ImageUpload;
use ridebook_db::ProductRepository;

/// Public catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/products/{id}", get(list_products))
}

/// Catalog routes that need a valid token.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/products", post(add_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
}

fn catalog_service(state: &AppState) -> CatalogService<ProductRepository> {
    CatalogService::new(
        state.images.clone(),
        Arc::new(ProductRepository::new((*state.db).clone())),
    )
}

fn multipart_error(err: &MultipartError) -> Response {
    json_error(err.status(), "invalid_form", &err.body_text())
}

/// Reads the text fields and image parts of a product form.
async fn read_form(mut multipart: Multipart) -> Result<(ProductInput, Vec<ImageUpload>), Response> {
    let mut input = ProductInput::default();
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "images" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| multipart_error(&e))?;
                uploads.push(ImageUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "productName" | "description" | "price" => {
                let text = field.text().await.map_err(|e| multipart_error(&e))?;
                let slot = match name.as_str() {
                    "productName" => &mut input.product_name,
                    "description" => &mut input.description,
                    _ => &mut input.price,
                };
                *slot = Some(text);
            }
            _ => {}
        }
    }

    Ok((input, uploads))
}

/// POST /products - Create a product owned by the caller.
async fn add_product(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Response {
    let (input, uploads) = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    match catalog_service(&state)
        .add_product(auth.account_id(), input, uploads)
        .await
    {
        Ok(product) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "Product added successfully",
                "product": product,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /products/{companyName} - Products listed by a company.
async fn list_products(
    State(state): State<AppState>,
    ApiPath(company_name): ApiPath<String>,
) -> Response {
    match catalog_service(&state).list_by_company(&company_name).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => error_response(e),
    }
}

/// PUT /products/{id} - Update a product owned by the caller.
async fn update_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    multipart: Multipart,
) -> Response {
    let (input, uploads) = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    match catalog_service(&state)
        .update_product(auth.account_id(), id, input, uploads)
        .await
    {
        Ok(product) => Json(json!({
            "message": "Product updated successfully",
            "product": product,
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// DELETE /products/{id} - Delete a product owned by the caller.
async fn delete_product(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Response {
    match catalog_service(&state)
        .delete_product(auth.account_id(), id)
        .await
    {
        Ok(()) => Json(json!({ "message": "Product deleted successfully" })).into_response(),
        Err(e) => error_response(e),
    }
}
