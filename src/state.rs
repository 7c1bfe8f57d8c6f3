//! Shared application state.

use crate::cache::TtlCache;
use crate::config::Config;
use crate::db;
use crate::models::{PaginatedResponse, PostResponse};
use crate::services::auth_service::{AuthService, TokenKeys};
use crate::services::file_service::FileService;
use crate::services::post_service::PostService;
use crate::services::redis_service::RedisService;
use crate::services::storage::ObjectStorageClient;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub redis: RedisService,
    pub token_keys: TokenKeys,
    pub storage: ObjectStorageClient,
    pub listing_cache: Arc<TtlCache<PaginatedResponse<PostResponse>>>,
    pub post_cache: Arc<TtlCache<PostResponse>>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db_pool = db::create_pool(&config.database).await?;
        let redis = RedisService::new(&config.redis).await?;
        let token_keys = TokenKeys::new(&config.auth);
        let storage = ObjectStorageClient::new(&config.storage)?;

        Ok(AppState {
            db_pool,
            redis,
            token_keys,
            storage,
            listing_cache: Arc::new(TtlCache::new()),
            post_cache: Arc::new(TtlCache::new()),
            config,
        })
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.db_pool.clone(), self.token_keys.clone())
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(
            self.db_pool.clone(),
            self.listing_cache.clone(),
            self.post_cache.clone(),
        )
    }

    pub fn file_service(&self) -> FileService {
        FileService::new(self.db_pool.clone(), self.storage.clone())
    }
}
