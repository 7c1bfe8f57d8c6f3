use crate::error::Result;
use crate::models::{PostResponse, UserResponse, UserRole};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// Flat row shape for a post joined with its author.
#[derive(Debug, FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    author_id: i64,
    author_email: String,
    author_name: String,
    author_role: UserRole,
    author_created_at: DateTime<Utc>,
}

impl From<PostRow> for PostResponse {
    fn from(row: PostRow) -> Self {
        PostResponse {
            id: row.id,
            title: row.title,
            content: row.content,
            author: UserResponse {
                id: row.author_id,
                email: row.author_email,
                name: row.author_name,
                role: row.author_role,
                created_at: row.author_created_at,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_POST: &str = "\
    SELECT p.id, p.title, p.content, p.created_at, p.updated_at, \
           u.id AS author_id, u.email AS author_email, u.name AS author_name, \
           u.role AS author_role, u.created_at AS author_created_at \
    FROM posts p \
    JOIN users u ON u.id = p.author_id";

/// Lists posts newest-first with an optional case-insensitive title
/// substring filter.
pub async fn list(
    pool: &PgPool,
    title_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostResponse>> {
    let rows = sqlx::query_as::<_, PostRow>(&format!(
        "{SELECT_POST} \
         WHERE ($1::text IS NULL OR p.title ILIKE '%' || $1 || '%') \
         ORDER BY p.created_at DESC \
         LIMIT $2 OFFSET $3"
    ))
    .bind(title_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PostResponse::from).collect())
}

/// Counts all posts matching the filter, ignoring pagination.
pub async fn count(pool: &PgPool, title_filter: Option<&str>) -> Result<i64> {
    let total = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM posts \
         WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')",
    )
    .bind(title_filter)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

pub async fn find(pool: &PgPool, id: i64) -> Result<Option<PostResponse>> {
    let row = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POST} WHERE p.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(PostResponse::from))
}

pub async fn insert(
    pool: &PgPool,
    title: &str,
    content: &str,
    author_id: i64,
) -> Result<Option<PostResponse>> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (title, content, author_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(title)
    .bind(content)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    find(pool, id).await
}

/// Partial update: only provided fields overwrite, `updated_at` is stamped.
pub async fn update(
    pool: &PgPool,
    id: i64,
    title: Option<&str>,
    content: Option<&str>,
) -> Result<Option<PostResponse>> {
    let updated = sqlx::query(
        "UPDATE posts \
         SET title = COALESCE($2, title), \
             content = COALESCE($3, content), \
             updated_at = NOW() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(title)
    .bind(content)
    .execute(pool)
    .await?;

    if updated.rows_affected() == 0 {
        return Ok(None);
    }

    find(pool, id).await
}

/// Physical delete. Returns whether a row was removed.
pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(deleted.rows_affected() > 0)
}
