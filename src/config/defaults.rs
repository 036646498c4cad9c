//! Default values for configuration fields.
//!
//! `scope` holds the built-in fallback for scoped paths, consulted after the
//! store and default scopes. The other functions are used by serde for
//! default deserialization.

use super::keys;

// ============================================================================
// Scoped Path Defaults
// ============================================================================

pub mod scope {
    use super::keys;

    /// Built-in value for a scoped config path, if it has one.
    ///
    /// Media and static URLs have no entry: they derive from the base URL.
    pub fn value(path: &str) -> Option<&'static str> {
        let value = match path {
            keys::RELATED_POSTS_ENABLED | keys::RELATED_PRODUCTS_ENABLED => "1",
            keys::RELATED_POSTS_NUMBER | keys::RELATED_PRODUCTS_NUMBER => "5",
            keys::RELATED_POSTS_DEPTH => "3",
            keys::BASE_URL => "http://localhost/",
            keys::LOCALE => "en_US",
            keys::ROUTE => "blog",
            keys::POST_ROUTE => "post",
            keys::TAG_ROUTE => "tag",
            keys::CATEGORY_ROUTE => "category",
            keys::AUTHOR_ROUTE => "author",
            keys::URL_SUFFIX => "",
            _ => return None,
        };
        Some(value)
    }
}

// ============================================================================
// Limits
// ============================================================================

/// Page size used when the configured related-item count is not positive.
pub const RELATED_PAGE_SIZE: i64 = 5;

/// Related-post nesting used when the configured depth is unset or not positive.
pub const RELATED_POSTS_DEPTH: i64 = 3;

// ============================================================================
// [[themes]] Defaults
// ============================================================================

pub mod theme {
    use crate::design::Area;

    pub fn area() -> Area {
        Area::Frontend
    }
}
