//! HTTP surface: handlers and router assembly.

pub mod auth;
pub mod posts;
pub mod uploads;

use crate::middleware::auth::{require_admin, require_auth};
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

pub fn create_api_router(state: Arc<AppState>) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh_token))
        .route("/posts", get(posts::get_all_posts))
        .route("/posts/:id", get(posts::get_single_post))
        .route("/file-upload", get(uploads::get_all_files))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ));

    // layer order: authentication runs first, then the user-keyed limiter
    let authenticated_routes = Router::new()
        .route("/auth/profile", get(auth::profile))
        .route("/posts", post(posts::create_post))
        .route("/posts/:id", put(posts::update_post))
        .route("/file-upload", post(uploads::upload_file))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let admin_routes = Router::new()
        .route("/auth/create-admin", post(auth::create_admin))
        .route("/posts/:id", delete(posts::delete_post))
        .route("/file-upload/:id", delete(uploads::delete_file))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(axum_middleware::from_fn(require_admin))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .with_state(state)
}
