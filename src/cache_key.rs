//! Cache key generation utilities
//!
//! Keys must be deterministic: two semantically identical queries always
//! produce the same string, and distinct (page, limit, filter) triples
//! always produce distinct strings.

/// Fingerprint for a paginated post listing query.
pub fn post_listing(page: u32, limit: u32, title: Option<&str>) -> String {
    format!(
        "posts_listing_{}_{}_title:{}",
        page,
        limit,
        title.unwrap_or("all")
    )
}

/// Key for a single cached post.
pub fn single_post(post_id: i64) -> String {
    format!("post_{}", post_id)
}

/// Redis key for the per-email-and-IP login rate window.
pub fn login_rate(email: &str, ip: &str) -> String {
    format!("rate:login:{}:{}", email, ip)
}

/// Redis key for a fixed-window endpoint rate counter.
pub fn endpoint_rate(scope: &str, identifier: &str) -> String {
    format!("rate:{}:{}", scope, identifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_fingerprint_is_deterministic() {
        let a = post_listing(2, 10, Some("rust"));
        let b = post_listing(2, 10, Some("rust"));
        assert_eq!(a, b);
    }

    #[test]
    fn listing_fingerprint_differs_per_field() {
        let base = post_listing(1, 10, Some("rust"));
        assert_ne!(base, post_listing(2, 10, Some("rust")));
        assert_ne!(base, post_listing(1, 20, Some("rust")));
        assert_ne!(base, post_listing(1, 10, Some("go")));
        assert_ne!(base, post_listing(1, 10, None));
    }

    #[test]
    fn absent_filter_defaults_to_all() {
        assert_eq!(post_listing(1, 10, None), "posts_listing_1_10_title:all");
    }

    #[test]
    fn single_post_key_embeds_the_id() {
        assert_eq!(single_post(7), "post_7");
    }
}
