use crate::error::Result;
use crate::models::UploadedFile;
use sqlx::PgPool;
use uuid::Uuid;

const FILE_COLUMNS: &str = "id, public_id, url, description, uploader_id, created_at";

pub async fn insert(
    pool: &PgPool,
    public_id: &str,
    url: &str,
    description: Option<&str>,
    uploader_id: i64,
) -> Result<UploadedFile> {
    let record = sqlx::query_as::<_, UploadedFile>(&format!(
        "INSERT INTO uploaded_files (id, public_id, url, description, uploader_id) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {FILE_COLUMNS}"
    ))
    .bind(Uuid::new_v4())
    .bind(public_id)
    .bind(url)
    .bind(description)
    .bind(uploader_id)
    .fetch_one(pool)
    .await?;

    Ok(record)
}

pub async fn list(pool: &PgPool) -> Result<Vec<UploadedFile>> {
    let records = sqlx::query_as::<_, UploadedFile>(&format!(
        "SELECT {FILE_COLUMNS} FROM uploaded_files ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(records)
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<UploadedFile>> {
    let record = sqlx::query_as::<_, UploadedFile>(&format!(
        "SELECT {FILE_COLUMNS} FROM uploaded_files WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
    let deleted = sqlx::query("DELETE FROM uploaded_files WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(deleted.rows_affected() > 0)
}
