//! API route definitions.

use axum::{Router, middleware};

use crate::{
    AppState,
    middleware::{auth_middleware, require_admin, require_superadmin},
};

pub mod auth;
pub mod bookings;
pub mod health;
pub mod products;
pub mod protected;
pub mod quotes;
pub mod superadmin;

/// Creates the API router, wiring authentication and role gates.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let authenticate = middleware::from_fn_with_state(state.clone(), auth_middleware);

    // Any valid token
    let token_routes = Router::new()
        .merge(auth::protected_routes())
        .merge(products::protected_routes())
        .route_layer(authenticate.clone());

    let admin_routes = protected::admin_routes()
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(authenticate.clone());

    let superadmin_routes = Router::new()
        .merge(protected::superadmin_routes())
        .merge(superadmin::routes())
        .route_layer(middleware::from_fn(require_superadmin))
        .route_layer(authenticate);

    Router::new()
        .merge(auth::routes())
        .merge(products::routes())
        .merge(bookings::routes())
        .merge(quotes::routes())
        .merge(token_routes)
        .merge(admin_routes)
        .merge(superadmin_routes)
}
