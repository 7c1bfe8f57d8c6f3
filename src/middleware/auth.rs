//! Bearer-token authentication middleware.

use crate::error::AppError;
use crate::models::{AuthUser, UserRole};
use crate::services::access_control;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

fn bearer_token(auth_header: &str) -> Result<&str, AppError> {
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::authentication("Invalid authorization header format"))?;

    if token.is_empty() {
        return Err(AppError::authentication("Empty token"));
    }

    Ok(token)
}

/// Verifies the access token and installs the [`AuthUser`] principal into
/// request extensions. Downstream handlers take it via `Extension`.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            warn!("missing authorization header");
            AppError::authentication("Missing authorization header")
        })?
        .to_str()
        .map_err(|_| AppError::authentication("Invalid authorization header"))?;

    let token = bearer_token(auth_header)?;
    let claims = state.token_keys.verify_access_token(token)?;

    let user_id: i64 = claims
        .sub
        .parse()
        .map_err(|_| AppError::authentication("Invalid token"))?;

    request.extensions_mut().insert(AuthUser {
        id: user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Admin gate. Must run after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or_else(|| AppError::authentication("User context not found"))?;

    if !access_control::has_role(user, &[UserRole::Admin]) {
        return Err(AppError::authorization("Admin role required"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_strips_the_scheme() {
        assert_eq!(bearer_token("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
    }

    #[test]
    fn bearer_token_rejects_other_schemes_and_empty_tokens() {
        assert!(bearer_token("Basic dXNlcg==").is_err());
        assert!(bearer_token("Bearer ").is_err());
        assert!(bearer_token("abc.def.ghi").is_err());
    }
}
