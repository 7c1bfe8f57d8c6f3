//! Post endpoints.

use crate::error::Result;
use crate::models::{
    AuthUser, CreatePostRequest, ListPostsQuery, PaginatedResponse, PostResponse,
    UpdatePostRequest,
};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use validator::Validate;

/// GET /posts
pub async fn get_all_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<PaginatedResponse<PostResponse>>> {
    let result = state.post_service().get_all_posts(&query).await?;
    Ok(Json(result))
}

/// GET /posts/:id
pub async fn get_single_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>> {
    let post = state.post_service().get_single_post(id).await?;
    Ok(Json(post))
}

/// POST /posts
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>)> {
    request.validate()?;

    let post = state.post_service().create_post(&request, &user).await?;

    Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /posts/:id (author or admin)
pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<PostResponse>> {
    request.validate()?;

    let post = state.post_service().update_post(id, &request, &user).await?;

    Ok(Json(post))
}

/// DELETE /posts/:id (admin only)
pub async fn delete_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.post_service().delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
