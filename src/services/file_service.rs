//! Uploaded-file service: remote upload plus a local record.

use crate::db;
use crate::error::{AppError, Result};
use crate::models::{AuthUser, UploadedFile};
use crate::services::storage::ObjectStorageClient;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct FileService {
    pool: PgPool,
    storage: ObjectStorageClient,
}

impl FileService {
    pub fn new(pool: PgPool, storage: ObjectStorageClient) -> Self {
        FileService { pool, storage }
    }

    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        description: Option<String>,
        uploader: &AuthUser,
    ) -> Result<UploadedFile> {
        let object = self.storage.upload(bytes, filename).await?;

        let record = db::files::insert(
            &self.pool,
            &object.public_id,
            &object.url,
            description.as_deref(),
            uploader.id,
        )
        .await?;

        info!(file_id = %record.id, uploader_id = uploader.id, "file uploaded");

        Ok(record)
    }

    pub async fn get_all_files(&self) -> Result<Vec<UploadedFile>> {
        db::files::list(&self.pool).await
    }

    /// Removes the remote object first; the local record only goes away
    /// once the store confirmed the delete.
    pub async fn delete_file(&self, id: Uuid) -> Result<()> {
        let record = db::files::find(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File with ID {}", id)))?;

        self.storage.delete(&record.public_id).await?;
        db::files::delete(&self.pool, id).await?;

        info!(file_id = %id, "file deleted");

        Ok(())
    }
}
