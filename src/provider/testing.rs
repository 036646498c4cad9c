//! Shared fixture for provider tests.
//!
//! | Record | Notes |
//! |--------|-------|
//! | post 1 | tags 1, 2; category 1; author 1; related posts 2, 3; seven related products |
//! | post 2 | tag 2; related post 1; no author |
//! | post 3 | no relations |
//! | post 4 | inactive |
//! | tag 1 | content with a theme asset |
//! | tag 3, category 2, author 2 | inactive |

use super::Services;
use crate::config::{BlogConfig, ConfigHandle};
use crate::content::{ContentFilter, DirectiveFilter, RenderEnv};
use crate::design::{Area, DesignState, RenderContext};
use crate::repository::MemoryRepository;
use anyhow::{Result, bail};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::Arc;

pub(crate) const FIXTURE_CONFIG: &str = r#"
[scope.default]
"web/secure/base_url" = "https://shop.example.com/"
"mfblog/permalink/url_suffix" = ".html"
"mfblog/post_view/related_posts/enabled" = true
"mfblog/post_view/related_products/enabled" = true
"design/theme/theme_id" = "3"

[scope.stores.german]
"web/secure/base_url" = "https://shop.example.com/de/"

[[themes]]
id = "3"
code = "Magento/luma"
"#;

pub(crate) fn fixture() -> serde_json::Value {
    json!({
        "posts": [
            {
                "post_id": "1",
                "is_active": 1,
                "title": "Hello World",
                "identifier": "hello-world",
                "author_id": "1",
                "featured_img": "magefan_blog/cover.jpg",
                "content": "<p>Intro <img src=\"{{media url=\"magefan_blog/inline.png\"}}\"></p><!-- pagebreak --><p>The rest</p>"
            },
            {
                "post_id": "2",
                "is_active": 1,
                "title": "Second Post",
                "identifier": "second-post",
                "content": "<p>Second</p>"
            },
            { "post_id": "3", "is_active": "1", "title": "Third Post" },
            { "post_id": "4", "is_active": 0, "title": "Draft" }
        ],
        "tags": [
            {
                "tag_id": "1",
                "is_active": 1,
                "title": "Rust",
                "identifier": "rust",
                "content": "<p>Systems programming</p><img src=\"{{view url=\"images/rust.svg\"}}\">"
            },
            { "tag_id": "2", "is_active": 1, "title": "Async", "identifier": "async" },
            { "tag_id": "3", "is_active": 0, "title": "Hidden" }
        ],
        "categories": [
            {
                "category_id": "1",
                "is_active": 1,
                "title": "News",
                "identifier": "news",
                "meta_title": "Latest News",
                "content": "<p>What happened this week.</p>"
            },
            { "category_id": "2", "is_active": 0, "title": "Archive" }
        ],
        "authors": [
            {
                "author_id": "1",
                "is_active": 1,
                "firstname": "Jane",
                "lastname": "Doe",
                "identifier": "jane-doe",
                "featured_img": "magefan_blog/jane.jpg"
            },
            { "author_id": "2", "is_active": 0, "firstname": "Ghost" }
        ],
        "products": (1..=7)
            .map(|n| json!({ "entity_id": n.to_string(), "sku": format!("24-MB0{n}") }))
            .collect::<Vec<_>>(),
        "links": {
            "post_tags": { "1": ["1", "2"], "2": ["2"] },
            "post_categories": { "1": ["1"] },
            "post_related_posts": { "1": ["2", "3"], "2": ["1"] },
            "post_related_products": { "1": ["1", "2", "3", "4", "5", "6", "7"] }
        }
    })
}

pub(crate) fn repository() -> MemoryRepository {
    MemoryRepository::from_json(&fixture().to_string()).unwrap()
}

pub(crate) fn config(toml: &str) -> Arc<ConfigHandle> {
    Arc::new(ConfigHandle::new(BlogConfig::from_str(toml).unwrap()))
}

/// Services over `repository`, starting in the GraphQL area without a theme.
pub(crate) fn services_with(repository: MemoryRepository, toml: &str) -> Services {
    Services::new(Arc::new(repository), config(toml)).with_design(Arc::new(DesignState::new(
        RenderContext::new(Area::Graphql),
    )))
}

pub(crate) fn services(toml: &str) -> Services {
    services_with(repository(), toml)
}

/// Directive filter that records the context of every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingFilter {
    contexts: Mutex<Vec<RenderContext>>,
}

impl RecordingFilter {
    pub(crate) fn calls(&self) -> usize {
        self.contexts.lock().len()
    }

    pub(crate) fn contexts(&self) -> Vec<RenderContext> {
        self.contexts.lock().clone()
    }
}

impl ContentFilter for RecordingFilter {
    fn filter(&self, content: &str, env: &RenderEnv<'_>) -> Result<String> {
        self.contexts.lock().push(env.design.clone());
        DirectiveFilter::new().filter(content, env)
    }
}

/// Filter that always fails.
#[derive(Debug, Default)]
pub(crate) struct FailingFilter;

impl ContentFilter for FailingFilter {
    fn filter(&self, _content: &str, _env: &RenderEnv<'_>) -> Result<String> {
        bail!("content filter failed")
    }
}
