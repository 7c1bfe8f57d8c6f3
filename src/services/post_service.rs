//! Post service: read-through caching, pagination and ownership checks.

use crate::cache::TtlCache;
use crate::cache_key;
use crate::cache_ttl;
use crate::db;
use crate::error::{AppError, Result};
use crate::models::{
    AuthUser, CreatePostRequest, ListPostsQuery, PageMeta, PaginatedResponse, PostResponse,
    UpdatePostRequest,
};
use crate::services::access_control;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_LIMIT: u32 = 10;

pub struct PostService {
    pool: PgPool,
    listing_cache: Arc<TtlCache<PaginatedResponse<PostResponse>>>,
    post_cache: Arc<TtlCache<PostResponse>>,
}

impl PostService {
    pub fn new(
        pool: PgPool,
        listing_cache: Arc<TtlCache<PaginatedResponse<PostResponse>>>,
        post_cache: Arc<TtlCache<PostResponse>>,
    ) -> Self {
        PostService {
            pool,
            listing_cache,
            post_cache,
        }
    }

    pub async fn get_all_posts(
        &self,
        query: &ListPostsQuery,
    ) -> Result<PaginatedResponse<PostResponse>> {
        let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
        let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
        let title = query
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());

        let fingerprint = cache_key::post_listing(page, limit, title);

        if let Some(cached) = self.listing_cache.get(&fingerprint) {
            debug!(%fingerprint, "listing cache hit");
            return Ok(cached);
        }

        debug!(%fingerprint, "listing cache miss");
        let offset = (page as i64 - 1) * limit as i64;
        let items = db::posts::list(&self.pool, title, limit as i64, offset).await?;
        let total_items = db::posts::count(&self.pool, title).await? as u64;

        let result = PaginatedResponse {
            items,
            meta: PageMeta::new(page, limit, total_items),
        };

        self.listing_cache.put(
            &fingerprint,
            result.clone(),
            Duration::from_secs(cache_ttl::post_listing_ttl()),
        );

        Ok(result)
    }

    pub async fn get_single_post(&self, post_id: i64) -> Result<PostResponse> {
        let key = cache_key::single_post(post_id);

        if let Some(cached) = self.post_cache.get(&key) {
            return Ok(cached);
        }

        let post = db::posts::find(&self.pool, post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post with ID {}", post_id)))?;

        self.post_cache.put(
            &key,
            post.clone(),
            Duration::from_secs(cache_ttl::single_post_ttl()),
        );

        Ok(post)
    }

    pub async fn create_post(
        &self,
        data: &CreatePostRequest,
        author: &AuthUser,
    ) -> Result<PostResponse> {
        let post = db::posts::insert(&self.pool, &data.title, &data.content, author.id)
            .await?
            .ok_or_else(|| AppError::internal("Inserted post could not be read back"))?;

        // Invalidate only once the write has committed, so readers cannot
        // observe a stale listing that should already contain this post.
        self.listing_cache.invalidate_all();

        info!(post_id = post.id, author_id = author.id, "post created");

        Ok(post)
    }

    pub async fn update_post(
        &self,
        post_id: i64,
        patch: &UpdatePostRequest,
        actor: &AuthUser,
    ) -> Result<PostResponse> {
        let existing = self.get_single_post(post_id).await?;

        if !access_control::can_modify_post(actor, existing.author.id) {
            return Err(AppError::authorization("You can only update your own posts"));
        }

        let updated = db::posts::update(
            &self.pool,
            post_id,
            patch.title.as_deref(),
            patch.content.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::not_found(format!("Post with ID {}", post_id)))?;

        self.post_cache.invalidate(&cache_key::single_post(post_id));
        self.listing_cache.invalidate_all();

        Ok(updated)
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<()> {
        // NotFound surfaces here when the post never existed
        self.get_single_post(post_id).await?;

        if !db::posts::delete(&self.pool, post_id).await? {
            return Err(AppError::not_found(format!("Post with ID {}", post_id)));
        }

        self.post_cache.invalidate(&cache_key::single_post(post_id));
        self.listing_cache.invalidate_all();

        info!(post_id, "post deleted");

        Ok(())
    }
}
