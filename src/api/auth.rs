//! Authentication endpoints.

use crate::cache_key;
use crate::cache_ttl::RATE_LIMIT_WINDOW_SECONDS;
use crate::error::{AppError, Result};
use crate::middleware::rate_limit::{client_ip, LOGIN_ATTEMPTS_PER_MINUTE};
use crate::models::{
    AuthUser, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, UserResponse,
};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use std::sync::Arc;
use tracing::warn;
use validator::Validate;

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    request.validate()?;

    let user = state.auth_service().register(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            message: "Registration successful! Please login to continue.".to_string(),
        }),
    ))
}

/// POST /auth/login
///
/// The per-email-and-IP window lives here rather than in the middleware
/// because the email is only known once the body is parsed.
pub async fn login(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    request.validate()?;

    let key = cache_key::login_rate(&request.email, &client_ip(&headers));
    match state
        .redis
        .fixed_window_count(&key, RATE_LIMIT_WINDOW_SECONDS)
        .await
    {
        Ok(count) if count > LOGIN_ATTEMPTS_PER_MINUTE => {
            return Err(AppError::rate_limit(
                "Too many attempts. Please try again after 1 minute",
            ));
        }
        Ok(_) => {}
        Err(e) => warn!("login rate limit check failed, allowing request: {}", e),
    }

    let response = state.auth_service().login(&request).await?;

    Ok(Json(response))
}

/// POST /auth/refresh
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>> {
    let access_token = state
        .auth_service()
        .refresh_token(&request.refresh_token)
        .await?;

    Ok(Json(RefreshResponse { access_token }))
}

/// GET /auth/profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let user = state.auth_service().get_user_by_id(user.id).await?;
    Ok(Json(user))
}

/// POST /auth/create-admin (admin only)
pub async fn create_admin(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    request.validate()?;

    let user = state.auth_service().create_admin(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user,
            message: "Admin user created successfully! Please login to continue.".to_string(),
        }),
    ))
}
