//! Fixed-window rate limiting backed by Redis counters.
//!
//! Windows are 60 seconds. A Redis fault never fails the request: the
//! limiter degrades to allowing traffic, with a warning.

use crate::cache_key;
use crate::cache_ttl::RATE_LIMIT_WINDOW_SECONDS;
use crate::error::AppError;
use crate::models::AuthUser;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

/// Per-minute attempts allowed for login, keyed by email and client IP.
/// Checked in the login handler, where the email is available.
pub const LOGIN_ATTEMPTS_PER_MINUTE: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointLimit {
    pub scope: &'static str,
    pub per_minute: i64,
}

/// Rate-limit table per endpoint. Paths not listed here pass through.
pub fn endpoint_limit(method: &Method, path: &str) -> Option<EndpointLimit> {
    match (method, path) {
        (&Method::POST, "/auth/register") => Some(EndpointLimit {
            scope: "auth_register",
            per_minute: 3,
        }),
        (&Method::POST, "/auth/refresh") => Some(EndpointLimit {
            scope: "auth_refresh",
            per_minute: 10,
        }),
        (&Method::POST, "/auth/create-admin") => Some(EndpointLimit {
            scope: "auth_create_admin",
            per_minute: 2,
        }),
        (&Method::POST, "/posts") => Some(EndpointLimit {
            scope: "posts_create",
            per_minute: 10,
        }),
        (&Method::PUT, p) if p.starts_with("/posts/") => Some(EndpointLimit {
            scope: "posts_update",
            per_minute: 20,
        }),
        (&Method::DELETE, p) if p.starts_with("/posts/") => Some(EndpointLimit {
            scope: "posts_delete",
            per_minute: 5,
        }),
        _ => None,
    }
}

/// Best-effort client IP from proxy headers.
pub fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.split(',').next().unwrap_or("unknown").trim().to_string())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(limit) = endpoint_limit(request.method(), request.uri().path()) else {
        return Ok(next.run(request).await);
    };

    // Authenticated endpoints are keyed by user, anonymous ones by IP.
    let identifier = match request.extensions().get::<AuthUser>() {
        Some(user) => user.id.to_string(),
        None => client_ip(request.headers()),
    };

    let key = cache_key::endpoint_rate(limit.scope, &identifier);

    match state
        .redis
        .fixed_window_count(&key, RATE_LIMIT_WINDOW_SECONDS)
        .await
    {
        Ok(count) if count > limit.per_minute => Err(AppError::rate_limit(
            "Too many attempts. Please try again after 1 minute",
        )),
        Ok(_) => Ok(next.run(request).await),
        Err(e) => {
            warn!(scope = limit.scope, "rate limit check failed, allowing request: {}", e);
            Ok(next.run(request).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn limits_match_the_endpoint_table() {
        assert_eq!(
            endpoint_limit(&Method::POST, "/auth/register").unwrap().per_minute,
            3
        );
        assert_eq!(
            endpoint_limit(&Method::POST, "/auth/refresh").unwrap().per_minute,
            10
        );
        assert_eq!(
            endpoint_limit(&Method::POST, "/auth/create-admin")
                .unwrap()
                .per_minute,
            2
        );
        assert_eq!(
            endpoint_limit(&Method::POST, "/posts").unwrap().per_minute,
            10
        );
        assert_eq!(
            endpoint_limit(&Method::PUT, "/posts/7").unwrap().per_minute,
            20
        );
        assert_eq!(
            endpoint_limit(&Method::DELETE, "/posts/7").unwrap().per_minute,
            5
        );
    }

    #[test]
    fn unlisted_endpoints_pass_through() {
        assert!(endpoint_limit(&Method::GET, "/posts").is_none());
        assert!(endpoint_limit(&Method::GET, "/posts/7").is_none());
        assert!(endpoint_limit(&Method::GET, "/file-upload").is_none());
        // login is limited in the handler, per email and IP
        assert!(endpoint_limit(&Method::POST, "/auth/login").is_none());
    }

    #[test]
    fn client_ip_prefers_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        assert_eq!(client_ip(&headers), "203.0.113.9");

        let mut real_ip_only = HeaderMap::new();
        real_ip_only.insert("x-real-ip", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(client_ip(&real_ip_only), "198.51.100.4");

        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }
}
