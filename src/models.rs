//! Database models and request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Admin => "admin",
        }
    }
}

/// User row as stored. The password hash never leaves the service layer;
/// outward-facing responses use [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Sanitized user representation returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Authenticated principal established once by token verification and
/// passed explicitly to downstream calls.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 3, max = 50, message = "Name must be 3 to 50 characters long"))]
    pub name: String,
    #[validate(length(min = 6, message = "Password must be atleast 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be atleast 6 characters long"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 3, max = 50, message = "Title must be 3 to 50 characters long"))]
    pub title: String,
    #[validate(length(min = 50, message = "Content must be atleast 50 characters long"))]
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 3, max = 50, message = "Title must be 3 to 50 characters long"))]
    pub title: Option<String>,
    #[validate(length(min = 50, message = "Content must be atleast 50 characters long"))]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: UserResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl PageMeta {
    pub fn new(current_page: u32, items_per_page: u32, total_items: u64) -> Self {
        let per_page = items_per_page.max(1) as u64;
        let total_pages = (total_items.div_ceil(per_page)) as u32;

        PageMeta {
            current_page,
            items_per_page,
            total_items,
            total_pages,
            has_previous_page: current_page > 1,
            has_next_page: current_page < total_pages,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UploadedFile {
    pub id: Uuid,
    pub public_id: String,
    pub url: String,
    pub description: Option<String>,
    pub uploader_id: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_meta_computes_total_pages_with_ceiling() {
        let meta = PageMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.total_items, 25);
    }

    #[test]
    fn page_meta_flags_on_last_page() {
        let meta = PageMeta::new(3, 10, 25);
        assert!(meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn page_meta_flags_on_single_page() {
        let meta = PageMeta::new(1, 10, 4);
        assert_eq!(meta.total_pages, 1);
        assert!(!meta.has_previous_page);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn page_meta_middle_page_has_both_neighbours() {
        let meta = PageMeta::new(2, 10, 25);
        assert!(meta.has_previous_page);
        assert!(meta.has_next_page);
    }

    #[test]
    fn page_meta_empty_result_has_no_pages() {
        let meta = PageMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn register_request_rejects_out_of_range_fields() {
        use validator::Validate;

        let bad_email = RegisterRequest {
            email: "not-an-email".into(),
            name: "Alice".into(),
            password: "secret1".into(),
        };
        assert!(bad_email.validate().is_err());

        let short_name = RegisterRequest {
            email: "a@x.com".into(),
            name: "Al".into(),
            password: "secret1".into(),
        };
        assert!(short_name.validate().is_err());

        let short_password = RegisterRequest {
            email: "a@x.com".into(),
            name: "Alice".into(),
            password: "12345".into(),
        };
        assert!(short_password.validate().is_err());

        let ok = RegisterRequest {
            email: "a@x.com".into(),
            name: "Alice".into(),
            password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn create_post_request_enforces_title_and_content_bounds() {
        use validator::Validate;

        let ok = CreatePostRequest {
            title: "TTT".into(),
            content: "C".repeat(50),
        };
        assert!(ok.validate().is_ok());

        let short_title = CreatePostRequest {
            title: "TT".into(),
            content: "C".repeat(50),
        };
        assert!(short_title.validate().is_err());

        let long_title = CreatePostRequest {
            title: "T".repeat(51),
            content: "C".repeat(50),
        };
        assert!(long_title.validate().is_err());

        let short_content = CreatePostRequest {
            title: "Title".into(),
            content: "C".repeat(49),
        };
        assert!(short_content.validate().is_err());
    }

    #[test]
    fn update_post_request_skips_absent_fields() {
        use validator::Validate;

        let empty = UpdatePostRequest::default();
        assert!(empty.validate().is_ok());

        let bad_title = UpdatePostRequest {
            title: Some("ab".into()),
            content: None,
        };
        assert!(bad_title.validate().is_err());
    }

    #[test]
    fn user_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
        assert_eq!(UserRole::User.as_str(), "user");
    }
}
