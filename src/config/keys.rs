//! Configuration paths read by the providers.
//!
//! Paths follow the `section/group/field` layout of the host application's
//! scoped configuration.

// ============================================================================
// Related content
// ============================================================================

pub const RELATED_POSTS_ENABLED: &str = "mfblog/post_view/related_posts/enabled";
pub const RELATED_POSTS_NUMBER: &str = "mfblog/post_view/related_posts/number_of_posts";
pub const RELATED_PRODUCTS_ENABLED: &str = "mfblog/post_view/related_products/enabled";
pub const RELATED_PRODUCTS_NUMBER: &str = "mfblog/post_view/related_products/number_of_products";

/// Maximum nesting of `related_posts` inside `related_posts`.
pub const RELATED_POSTS_DEPTH: &str = "mfblog/graphql/related_posts_depth";

// ============================================================================
// Design
// ============================================================================

pub const THEME_ID: &str = "design/theme/theme_id";

// ============================================================================
// URLs
// ============================================================================

pub const BASE_URL: &str = "web/secure/base_url";
pub const MEDIA_URL: &str = "web/secure/base_media_url";
pub const STATIC_URL: &str = "web/secure/base_static_url";
pub const LOCALE: &str = "general/locale/code";

pub const ROUTE: &str = "mfblog/permalink/route";
pub const POST_ROUTE: &str = "mfblog/permalink/post_route";
pub const TAG_ROUTE: &str = "mfblog/permalink/tag_route";
pub const CATEGORY_ROUTE: &str = "mfblog/permalink/category_route";
pub const AUTHOR_ROUTE: &str = "mfblog/permalink/author_route";
pub const URL_SUFFIX: &str = "mfblog/permalink/url_suffix";
