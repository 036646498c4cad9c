//! Post data provider: selective, recursive field materialization.
//!
//! # Materialization order
//!
//! | Step | Key(s) | Included when |
//! |------|--------|---------------|
//! | 1 | base data | always |
//! | 2 | [`PostField`] keys | unbounded or selected |
//! | 3 | `tags` | unbounded or selected |
//! | 4 | `related_posts` | named explicitly |
//! | 5 | `related_products` | named explicitly |
//! | 6 | `categories` | unbounded or selected |
//! | 7 | `author` | unbounded or selected, and the post has an author |
//! | 8 | `canonical_url` | named explicitly |
//!
//! Related content is opt-in even under an unbounded selection: it costs
//! paginated queries and sits behind store-level feature flags.

use super::{
    AuthorProvider, CategoryProvider, ComputedField, Services, TagProvider, describe,
    insert_computed, text_value,
};
use crate::config::{ConfigSource, Scope, defaults, keys};
use crate::content::{ContentFilter, RenderEnv, html};
use crate::error::Result;
use crate::fields::{Fields, Selection};
use crate::log;
use crate::model::{DataMap, Entity, Post};
use crate::repository::{CollectionQuery, load_active};
use serde_json::Value;

const TAGS: &str = "tags";
const RELATED_POSTS: &str = "related_posts";
const RELATED_PRODUCTS: &str = "related_products";
const CATEGORIES: &str = "categories";
const AUTHOR: &str = "author";
const CANONICAL_URL: &str = "canonical_url";

/// Default `og_type` when none is stored.
const DEFAULT_OG_TYPE: &str = "article";

// ============================================================================
// Computed Fields
// ============================================================================

/// Computed post fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostField {
    OgImage,
    OgType,
    OgDescription,
    OgTitle,
    MetaDescription,
    MetaTitle,
    ShortFilteredContent,
    FilteredContent,
    FirstImage,
    FeaturedImage,
    PostUrl,
}

impl ComputedField for PostField {
    const ALL: &'static [Self] = &[
        Self::OgImage,
        Self::OgType,
        Self::OgDescription,
        Self::OgTitle,
        Self::MetaDescription,
        Self::MetaTitle,
        Self::ShortFilteredContent,
        Self::FilteredContent,
        Self::FirstImage,
        Self::FeaturedImage,
        Self::PostUrl,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::OgImage => "og_image",
            Self::OgType => "og_type",
            Self::OgDescription => "og_description",
            Self::OgTitle => "og_title",
            Self::MetaDescription => "meta_description",
            Self::MetaTitle => "meta_title",
            Self::ShortFilteredContent => "short_filtered_content",
            Self::FilteredContent => "filtered_content",
            Self::FirstImage => "first_image",
            Self::FeaturedImage => "featured_image",
            Self::PostUrl => "post_url",
        }
    }
}

/// Lazily derived values of one post.
///
/// Rendered content is cached so that several content-based fields filter
/// the post only once.
struct Derived<'a> {
    post: &'a Post,
    env: RenderEnv<'a>,
    filter: &'a dyn ContentFilter,
    filtered: Option<String>,
    short: Option<String>,
}

impl<'a> Derived<'a> {
    fn new(post: &'a Post, env: RenderEnv<'a>, filter: &'a dyn ContentFilter) -> Self {
        Self {
            post,
            env,
            filter,
            filtered: None,
            short: None,
        }
    }

    fn compute(&mut self, field: PostField) -> Result<Value> {
        let value = match field {
            PostField::OgImage => self.og_image()?,
            PostField::OgType => Some(self.og_type()),
            PostField::OgDescription => self.og_description()?,
            PostField::OgTitle => self.og_title(),
            PostField::MetaDescription => self.meta_description()?,
            PostField::MetaTitle => self.meta_title(),
            PostField::ShortFilteredContent => Some(self.short_filtered_content()?),
            PostField::FilteredContent => Some(self.filtered_content()?),
            PostField::FirstImage => self.first_image()?,
            PostField::FeaturedImage => self.featured_image(),
            PostField::PostUrl => Some(self.env.urls.post_url(self.post)),
        };
        Ok(text_value(value))
    }

    fn render(&self, content: &str) -> Result<String> {
        Ok(self.filter.filter(content, &self.env)?)
    }

    fn filtered_content(&mut self) -> Result<String> {
        if let Some(filtered) = &self.filtered {
            return Ok(filtered.clone());
        }
        let filtered = match self.post.text("content") {
            Some(content) => self.render(content)?,
            None => String::new(),
        };
        self.filtered = Some(filtered.clone());
        Ok(filtered)
    }

    /// `short_content`, else the teaser before the pagebreak, else all content.
    fn short_filtered_content(&mut self) -> Result<String> {
        if let Some(short) = &self.short {
            return Ok(short.clone());
        }
        let post = self.post;
        let short = if let Some(short_content) = post.text("short_content") {
            self.render(short_content)?
        } else if let Some(teaser) = post.text("content").and_then(html::before_pagebreak) {
            self.render(teaser)?
        } else {
            self.filtered_content()?
        };
        self.short = Some(short.clone());
        Ok(short)
    }

    fn first_image(&mut self) -> Result<Option<String>> {
        Ok(html::first_image(&self.filtered_content()?))
    }

    fn featured_image(&self) -> Option<String> {
        self.post
            .text("featured_img")
            .map(|path| self.env.urls.media_url(path))
    }

    fn meta_title(&self) -> Option<String> {
        self.post
            .text("meta_title")
            .or_else(|| self.post.text("title"))
            .map(str::to_owned)
    }

    fn meta_description(&mut self) -> Result<Option<String>> {
        if let Some(description) = self.post.text("meta_description") {
            return Ok(Some(description.to_owned()));
        }
        Ok(describe(&self.short_filtered_content()?))
    }

    fn og_title(&self) -> Option<String> {
        match self.post.text("og_title") {
            Some(title) => Some(title.to_owned()),
            None => self.meta_title(),
        }
    }

    fn og_description(&mut self) -> Result<Option<String>> {
        match self.post.text("og_description") {
            Some(description) => Ok(Some(description.to_owned())),
            None => self.meta_description(),
        }
    }

    fn og_type(&self) -> String {
        self.post
            .text("og_type")
            .unwrap_or(DEFAULT_OG_TYPE)
            .to_owned()
    }

    /// Stored og image, else featured image, else first image in content.
    fn og_image(&mut self) -> Result<Option<String>> {
        if let Some(path) = self.post.text("og_img") {
            return Ok(Some(self.env.urls.media_url(path)));
        }
        if let Some(featured) = self.featured_image() {
            return Ok(Some(featured));
        }
        self.first_image()
    }
}

// ============================================================================
// Provider
// ============================================================================

/// Materializes posts and delegates nested entities to their providers.
#[derive(Clone)]
pub struct PostProvider {
    services: Services,
    tags: TagProvider,
    categories: CategoryProvider,
    authors: AuthorProvider,
}

impl PostProvider {
    pub fn new(services: Services) -> Self {
        Self {
            tags: TagProvider::new(services.clone()),
            categories: CategoryProvider::new(services.clone()),
            authors: AuthorProvider::new(services.clone()),
            services,
        }
    }

    pub fn tags(&self) -> &TagProvider {
        &self.tags
    }

    pub fn categories(&self) -> &CategoryProvider {
        &self.categories
    }

    pub fn authors(&self) -> &AuthorProvider {
        &self.authors
    }

    /// Load an active post and materialize the requested fields.
    ///
    /// `fields = None` selects every field except the opt-in ones
    /// (`related_posts`, `related_products`, `canonical_url`).
    pub fn get_data(&self, post_id: &str, fields: Option<&Fields>) -> Result<DataMap> {
        let post = load_active::<Post, _>(self.services.repository.as_ref(), post_id)?;
        self.dynamic_data(&post, fields)
    }

    /// Materialize an already loaded post under the active design context.
    pub fn dynamic_data(&self, post: &Post, fields: Option<&Fields>) -> Result<DataMap> {
        let design = self.services.design.current();
        let urls = self.services.urls()?;
        let env = RenderEnv::new(&design, &urls);
        self.materialize(post, Selection::from(fields), env, 0)
    }

    /// `depth` counts the `related_posts` levels above `post`.
    fn materialize(
        &self,
        post: &Post,
        selection: Selection<'_>,
        env: RenderEnv<'_>,
        depth: usize,
    ) -> Result<DataMap> {
        let repository = self.services.repository.as_ref();
        let mut data = post.data().clone();

        let mut derived = Derived::new(post, env, self.services.filter.as_ref());
        insert_computed(&mut data, selection, |field| derived.compute(field))?;

        if selection.includes(TAGS) {
            // Tags always come back in full; nested tag selections are not applied.
            let tags = repository
                .related_tags(post)?
                .iter()
                .map(|tag| self.tags.materialize(tag, env).map(Value::Object))
                .collect::<Result<Vec<_>>>()?;
            data.insert(TAGS.into(), Value::Array(tags));
        }

        if selection.names(RELATED_POSTS) {
            let related = self.related_posts(post, selection.nested(RELATED_POSTS), env, depth)?;
            data.insert(RELATED_POSTS.into(), Value::Array(related));
        }

        if selection.names(RELATED_PRODUCTS) {
            let skus = self.related_products(post)?;
            data.insert(RELATED_PRODUCTS.into(), Value::Array(skus));
        }

        if selection.includes(CATEGORIES) {
            let nested = selection.nested(CATEGORIES);
            let categories = repository
                .parent_categories(post)?
                .iter()
                .map(|category| {
                    self.categories
                        .materialize(category, nested, env)
                        .map(Value::Object)
                })
                .collect::<Result<Vec<_>>>()?;
            data.insert(CATEGORIES.into(), Value::Array(categories));
        }

        if selection.includes(AUTHOR) {
            // No author means no key at all, unlike the empty lists above.
            if let Some(author) = repository.author(post)? {
                let author = self.authors.materialize(&author, env)?;
                data.insert(AUTHOR.into(), Value::Object(author));
            }
        }

        if selection.names(CANONICAL_URL) {
            data.insert(
                CANONICAL_URL.into(),
                Value::String(env.urls.canonical_post_url(post)),
            );
        }

        Ok(data)
    }

    fn related_posts(
        &self,
        post: &Post,
        nested: Selection<'_>,
        env: RenderEnv<'_>,
        depth: usize,
    ) -> Result<Vec<Value>> {
        let config = self.services.config.as_ref();
        let scope = &self.services.scope;

        if !config.flag(keys::RELATED_POSTS_ENABLED, scope)? {
            log!("post"; "related posts disabled for {}", scope);
            return Ok(Vec::new());
        }

        let max_depth = positive_or(
            config.int(keys::RELATED_POSTS_DEPTH, scope)?,
            defaults::RELATED_POSTS_DEPTH,
        );
        if !i64::try_from(depth).is_ok_and(|depth| depth < max_depth) {
            log!("post"; "related posts cut off at depth {}", depth);
            return Ok(Vec::new());
        }

        let query = CollectionQuery::new()
            .active()
            .page_size(page_size(config, keys::RELATED_POSTS_NUMBER, scope)?);

        self.services
            .repository
            .related_posts(post, query)?
            .iter()
            .map(|related| {
                self.materialize(related, nested, env, depth + 1)
                    .map(Value::Object)
            })
            .collect()
    }

    fn related_products(&self, post: &Post) -> Result<Vec<Value>> {
        let config = self.services.config.as_ref();
        let scope = &self.services.scope;

        if !config.flag(keys::RELATED_PRODUCTS_ENABLED, scope)? {
            log!("post"; "related products disabled for {}", scope);
            return Ok(Vec::new());
        }

        let query =
            CollectionQuery::new().page_size(page_size(config, keys::RELATED_PRODUCTS_NUMBER, scope)?);

        Ok(self
            .services
            .repository
            .related_products(post, query)?
            .into_iter()
            .map(|product| Value::String(product.sku))
            .collect())
    }
}

/// Configured page size; non-positive or unset values fall back to the default.
fn page_size(config: &dyn ConfigSource, path: &str, scope: &Scope) -> Result<usize> {
    let size = positive_or(config.int(path, scope)?, defaults::RELATED_PAGE_SIZE);
    Ok(usize::try_from(size).unwrap_or(usize::MAX))
}

/// Config sources other than `blogql.toml` may not know the key at all (`int` is 0).
fn positive_or(value: i64, default: i64) -> i64 {
    if value > 0 { value } else { default }
}
