//! Request extractors whose rejections use the `{error, message}` body.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::{StatusCode, request::Parts},
    response::Response,
};
use serde::de::DeserializeOwned;
use tracing::error;

use crate::error::{internal_error, json_error};

/// JSON body. Any unreadable body answers 400 `invalid_body`, including a
/// missing content type and fields of the wrong type.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_error(
                StatusCode::BAD_REQUEST,
                "invalid_body",
                &rejection.body_text(),
            )),
        }
    }
}

/// Path parameters. A segment that does not parse (a malformed booking
/// id, say) answers 400 `invalid_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) if rejection.status().is_server_error() => {
                error!(error = %rejection.body_text(), "path extraction failed");
                Err(internal_error())
            }
            Err(rejection) => Err(json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                &rejection.body_text(),
            )),
        }
    }
}

/// Query string. A malformed or repeated parameter answers 400
/// `invalid_query`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(json_error(
                StatusCode::BAD_REQUEST,
                "invalid_query",
                &rejection.body_text(),
            )),
        }
    }
}
