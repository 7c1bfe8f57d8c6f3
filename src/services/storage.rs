//! Opaque gateway to the remote object store.

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE_NAME: &str = "object-storage";

/// Metadata returned by the store for an uploaded object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredObject {
    pub public_id: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ObjectStorageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ObjectStorageClient {
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(ObjectStorageClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Streams the file bytes to the store and returns its public metadata.
    pub async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<StoredObject> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/upload", self.base_url))
            .header("x-api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!("upload failed with status {}", response.status()),
            ));
        }

        response
            .json::<StoredObject>()
            .await
            .map_err(|e| AppError::external_service(SERVICE_NAME, e.to_string()))
    }

    /// Deletes a stored object by its public id.
    pub async fn delete(&self, public_id: &str) -> Result<()> {
        let response = self
            .http
            .delete(format!("{}/files/{}", self.base_url, public_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| AppError::external_service(SERVICE_NAME, e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                SERVICE_NAME,
                format!("delete failed with status {}", response.status()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ObjectStorageClient {
        ObjectStorageClient::new(&StorageConfig {
            base_url: server.uri(),
            api_key: "test-key".into(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn upload_returns_storage_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .and(header("x-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "public_id": "blog/abc123",
                "url": "https://cdn.example.com/blog/abc123.png"
            })))
            .mount(&server)
            .await;

        let object = client_for(&server)
            .upload(b"png-bytes".to_vec(), "pic.png")
            .await
            .unwrap();

        assert_eq!(object.public_id, "blog/abc123");
        assert_eq!(object.url, "https://cdn.example.com/blog/abc123.png");
    }

    #[tokio::test]
    async fn upload_failure_surfaces_as_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .upload(b"bytes".to_vec(), "pic.png")
            .await
            .unwrap_err();

        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn delete_targets_the_public_id() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/blog/abc123"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        client_for(&server).delete("blog/abc123").await.unwrap();
    }

    #[tokio::test]
    async fn delete_failure_surfaces_as_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/files/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = client_for(&server).delete("missing").await.unwrap_err();
        assert_eq!(err.error_code(), "EXTERNAL_SERVICE_ERROR");
    }
}
