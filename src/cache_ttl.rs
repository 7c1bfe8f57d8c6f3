//! Centralized TTL constants for caching, with environment overrides.

use std::env;

/// Default TTL constants (in seconds)
pub const TTL_POST_LISTING: u64 = 30;
pub const TTL_SINGLE_POST: u64 = 30;

/// Fixed rate-limit window length.
pub const RATE_LIMIT_WINDOW_SECONDS: u64 = 60;

/// Get TTL with environment variable override
pub fn ttl_with_env(env_key: &str, default_ttl: u64) -> u64 {
    env::var(env_key)
        .map(|val| val.parse::<u64>().unwrap_or(default_ttl))
        .unwrap_or(default_ttl)
}

pub fn post_listing_ttl() -> u64 {
    ttl_with_env("TTL_POST_LISTING_SECONDS", TTL_POST_LISTING)
}

pub fn single_post_ttl() -> u64 {
    ttl_with_env("TTL_SINGLE_POST_SECONDS", TTL_SINGLE_POST)
}
