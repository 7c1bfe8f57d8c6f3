//! Identity service: registration, login, token issuance and refresh.

use crate::config::AuthConfig;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, UserResponse, UserRole};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;

/// bcrypt work factor, matching the original platform's setting.
const BCRYPT_COST: u32 = 10;

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Claims carried by a refresh token. Signed with a separate secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

/// HS256 signing material for both token families.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &AuthConfig) -> Self {
        TokenKeys {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl: Duration::seconds(config.access_token_ttl_seconds as i64),
            refresh_ttl: Duration::seconds(config.refresh_token_ttl_seconds as i64),
        }
    }

    pub fn issue_access_token(&self, user_id: i64, email: &str, role: UserRole) -> Result<String> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            exp: (now + self.access_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.access_encoding)
            .map_err(|e| AppError::internal(format!("Failed to generate access token: {}", e)))
    }

    pub fn issue_refresh_token(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            exp: (now + self.refresh_ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.refresh_encoding)
            .map_err(|e| AppError::internal(format!("Failed to generate refresh token: {}", e)))
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessClaims> {
        let token_data = decode::<AccessClaims>(token, &self.access_decoding, &Validation::default())
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::authentication("Token has expired")
                }
                _ => AppError::authentication("Invalid token"),
            })?;

        Ok(token_data.claims)
    }

    /// Verifies a refresh token against the refresh secret. Every failure
    /// mode collapses into the same Unauthorized signal.
    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshClaims> {
        let token_data = decode::<RefreshClaims>(token, &self.refresh_decoding, &Validation::default())
            .map_err(|_| AppError::authentication("Invalid token"))?;

        Ok(token_data.claims)
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))
}

pub struct AuthService {
    pool: PgPool,
    keys: TokenKeys,
}

impl AuthService {
    pub fn new(pool: PgPool, keys: TokenKeys) -> Self {
        AuthService { pool, keys }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse> {
        self.create_user(request, UserRole::User).await
    }

    pub async fn create_admin(&self, request: &RegisterRequest) -> Result<UserResponse> {
        self.create_user(request, UserRole::Admin).await
    }

    async fn create_user(&self, request: &RegisterRequest, role: UserRole) -> Result<UserResponse> {
        if db::users::find_by_email(&self.pool, &request.email)
            .await?
            .is_some()
        {
            return Err(AppError::conflict(
                "Email already in use! Please try with different email",
            ));
        }

        let password_hash = hash_password(&request.password)?;
        let user = db::users::insert(
            &self.pool,
            &request.email,
            &request.name,
            &password_hash,
            role,
        )
        .await?;

        info!(user_id = user.id, role = role.as_str(), "user created");

        Ok(user.into())
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let user = db::users::find_by_email(&self.pool, &request.email)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::authentication("Invalid credentials for login"));
        }

        let access_token = self.keys.issue_access_token(user.id, &user.email, user.role)?;
        let refresh_token = self.keys.issue_refresh_token(user.id)?;

        Ok(LoginResponse {
            user: user.into(),
            access_token,
            refresh_token,
        })
    }

    /// Verifies a refresh token and issues a fresh access token. The user
    /// must still exist; any failure is a uniform Unauthorized.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<String> {
        let claims = self.keys.verify_refresh_token(refresh_token)?;

        let user_id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::authentication("Invalid token"))?;

        let user = db::users::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid token"))?;

        self.keys.issue_access_token(user.id, &user.email, user.role)
    }

    pub async fn get_user_by_id(&self, user_id: i64) -> Result<UserResponse> {
        let user = db::users::find_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;

        Ok(user.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_keys() -> TokenKeys {
        TokenKeys::new(&AuthConfig {
            access_secret: "access-secret-for-tests".into(),
            refresh_secret: "refresh-secret-for-tests".into(),
            access_token_ttl_seconds: 900,
            refresh_token_ttl_seconds: 604800,
        })
    }

    #[test]
    fn access_token_round_trips_its_claims() {
        let keys = test_keys();
        let token = keys
            .issue_access_token(7, "a@x.com", UserRole::Admin)
            .unwrap();

        let claims = keys.verify_access_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_round_trips_subject_only() {
        let keys = test_keys();
        let token = keys.issue_refresh_token(7).unwrap();
        let claims = keys.verify_refresh_token(&token).unwrap();
        assert_eq!(claims.sub, "7");
    }

    #[test]
    fn access_token_is_not_accepted_as_refresh_token() {
        let keys = test_keys();
        let token = keys.issue_access_token(7, "a@x.com", UserRole::User).unwrap();
        assert!(keys.verify_refresh_token(&token).is_err());
    }

    #[test]
    fn refresh_token_is_not_accepted_as_access_token() {
        let keys = test_keys();
        let token = keys.issue_refresh_token(7).unwrap();
        assert!(keys.verify_access_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let keys = test_keys();
        let token = keys.issue_access_token(7, "a@x.com", UserRole::User).unwrap();
        let mut tampered = token.clone();
        // flip the last signature character
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });
        assert!(keys.verify_access_token(&tampered).is_err());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let keys = test_keys();
        // craft a token whose exp is beyond the default 60s leeway
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "7".into(),
            email: "a@x.com".into(),
            role: UserRole::User,
            exp: (now - Duration::seconds(120)).timestamp(),
            iat: (now - Duration::seconds(1000)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"access-secret-for-tests"),
        )
        .unwrap();

        let err = keys.verify_access_token(&token).unwrap_err();
        assert_eq!(err.to_string(), "Token has expired");
    }

    #[test]
    fn password_hash_verifies_only_the_original() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }
}
