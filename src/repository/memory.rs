//! In-memory content repository.
//!
//! Holds entity tables and relation links behind a `RwLock`, so one instance
//! can serve concurrent requests while a host swaps data in.
//!
//! # Fixture format
//!
//! ```json
//! {
//!   "posts":      [{ "post_id": "1", "is_active": 1, "title": "Hello", "author_id": "1" }],
//!   "tags":       [{ "tag_id": "1", "is_active": 1, "title": "Rust" }],
//!   "categories": [{ "category_id": "1", "is_active": 1, "title": "News" }],
//!   "authors":    [{ "author_id": "1", "is_active": 1, "firstname": "Jane" }],
//!   "products":   [{ "entity_id": "1", "sku": "24-MB01" }],
//!   "links": {
//!     "post_tags":             { "1": ["1"] },
//!     "post_categories":       { "1": ["1"] },
//!     "post_related_posts":    { "1": ["2", "3"] },
//!     "post_related_products": { "1": ["1"] }
//!   }
//! }
//! ```

use super::{CollectionQuery, PostRelations, Repository};
use crate::model::{Author, Category, Entity, Post, Product, Tag};
use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fs, path::Path};

/// Serialized content of a [`MemoryRepository`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub links: Links,
}

/// Relation tables, keyed by post id. Values keep relation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Links {
    #[serde(default)]
    pub post_tags: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub post_categories: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub post_related_posts: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub post_related_products: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Default)]
struct Tables {
    posts: FxHashMap<String, Post>,
    tags: FxHashMap<String, Tag>,
    categories: FxHashMap<String, Category>,
    authors: FxHashMap<String, Author>,
    products: FxHashMap<String, Product>,
    links: Links,
}

/// Thread-safe, in-process implementation of every repository contract.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Result<Self> {
        let repository = Self::new();
        repository.replace(fixture)?;
        Ok(repository)
    }

    /// Parse a JSON fixture.
    pub fn from_json(content: &str) -> Result<Self> {
        let fixture: Fixture = serde_json::from_str(content).context("invalid fixture JSON")?;
        Self::from_fixture(fixture)
    }

    /// Load a JSON fixture file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read fixture `{}`", path.display()))?;
        Self::from_json(&content)
    }

    /// Swap in new content atomically.
    ///
    /// Fails without touching the current content if a record has no id.
    pub fn replace(&self, fixture: Fixture) -> Result<()> {
        let tables = Tables {
            posts: index(fixture.posts)?,
            tags: index(fixture.tags)?,
            categories: index(fixture.categories)?,
            authors: index(fixture.authors)?,
            products: fixture
                .products
                .into_iter()
                .map(|product| (product.entity_id.clone(), product))
                .collect(),
            links: fixture.links,
        };
        *self.tables.write() = tables;
        Ok(())
    }

    pub fn insert_post(&self, post: Post) -> Result<()> {
        let id = require_id(&post)?;
        self.tables.write().posts.insert(id, post);
        Ok(())
    }

    pub fn insert_tag(&self, tag: Tag) -> Result<()> {
        let id = require_id(&tag)?;
        self.tables.write().tags.insert(id, tag);
        Ok(())
    }

    pub fn insert_category(&self, category: Category) -> Result<()> {
        let id = require_id(&category)?;
        self.tables.write().categories.insert(id, category);
        Ok(())
    }

    pub fn insert_author(&self, author: Author) -> Result<()> {
        let id = require_id(&author)?;
        self.tables.write().authors.insert(id, author);
        Ok(())
    }

    pub fn insert_product(&self, product: Product) {
        self.tables
            .write()
            .products
            .insert(product.entity_id.clone(), product);
    }

    /// Replace the tags linked to `post_id`.
    pub fn link_tags<I, S>(&self, post_id: &str, tag_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = tag_ids.into_iter().map(Into::into).collect();
        self.tables.write().links.post_tags.insert(post_id.into(), ids);
    }

    /// Replace the categories linked to `post_id`.
    pub fn link_categories<I, S>(&self, post_id: &str, category_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = category_ids.into_iter().map(Into::into).collect();
        self.tables
            .write()
            .links
            .post_categories
            .insert(post_id.into(), ids);
    }

    /// Replace the curated related posts of `post_id`.
    pub fn link_related_posts<I, S>(&self, post_id: &str, post_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = post_ids.into_iter().map(Into::into).collect();
        self.tables
            .write()
            .links
            .post_related_posts
            .insert(post_id.into(), ids);
    }

    /// Replace the related products of `post_id`.
    pub fn link_related_products<I, S>(&self, post_id: &str, product_ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids = product_ids.into_iter().map(Into::into).collect();
        self.tables
            .write()
            .links
            .post_related_products
            .insert(post_id.into(), ids);
    }

    fn related_posts_at(
        &self,
        post: &Post,
        query: CollectionQuery,
        now: NaiveDateTime,
    ) -> Vec<Post> {
        let tables = self.tables.read();
        let posts = linked(&tables.links.post_related_posts, post, &tables.posts)
            .filter(|related| {
                !query.active_only || (related.is_active() && related.is_published_at(now))
            })
            .cloned();
        paginate(posts, query)
    }
}

/// Build an id index, rejecting records without an id.
fn index<E: Entity>(records: Vec<E>) -> Result<FxHashMap<String, E>> {
    records
        .into_iter()
        .map(|record| Ok((require_id(&record)?, record)))
        .collect()
}

fn require_id<E: Entity>(entity: &E) -> Result<String> {
    entity
        .id()
        .with_context(|| format!("{} record without `{}`", E::KIND, E::ID_FIELD))
}

/// Records linked to `post` through `links`, in link order. Dangling ids are skipped.
fn linked<'a, T>(
    links: &'a BTreeMap<String, Vec<String>>,
    post: &Post,
    table: &'a FxHashMap<String, T>,
) -> impl Iterator<Item = &'a T> {
    post.id()
        .and_then(|id| links.get(&id))
        .into_iter()
        .flatten()
        .filter_map(move |id| table.get(id))
}

fn paginate<T>(items: impl Iterator<Item = T>, query: CollectionQuery) -> Vec<T> {
    match query.page_size {
        Some(size) => items.take(size).collect(),
        None => items.collect(),
    }
}

macro_rules! impl_repository {
    ($entity:ty, $table:ident) => {
        impl Repository<$entity> for MemoryRepository {
            fn load(&self, entity: &mut $entity, id: &str) -> Result<()> {
                if let Some(record) = self.tables.read().$table.get(id) {
                    entity.hydrate(record.data().clone());
                }
                Ok(())
            }
        }
    };
}

impl_repository!(Post, posts);
impl_repository!(Tag, tags);
impl_repository!(Category, categories);
impl_repository!(Author, authors);

impl PostRelations for MemoryRepository {
    fn related_tags(&self, post: &Post) -> Result<Vec<Tag>> {
        let tables = self.tables.read();
        Ok(linked(&tables.links.post_tags, post, &tables.tags)
            .filter(|tag| tag.is_active())
            .cloned()
            .collect())
    }

    fn parent_categories(&self, post: &Post) -> Result<Vec<Category>> {
        let tables = self.tables.read();
        Ok(linked(&tables.links.post_categories, post, &tables.categories)
            .filter(|category| category.is_active())
            .cloned()
            .collect())
    }

    fn author(&self, post: &Post) -> Result<Option<Author>> {
        let tables = self.tables.read();
        Ok(post
            .author_id()
            .and_then(|id| tables.authors.get(&id))
            .filter(|author| author.is_active())
            .cloned())
    }

    fn related_posts(&self, post: &Post, query: CollectionQuery) -> Result<Vec<Post>> {
        Ok(self.related_posts_at(post, query, Utc::now().naive_utc()))
    }

    fn related_products(&self, post: &Post, query: CollectionQuery) -> Result<Vec<Product>> {
        let tables = self.tables.read();
        let products = linked(&tables.links.post_related_products, post, &tables.products).cloned();
        Ok(paginate(products, query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn fixture() -> serde_json::Value {
        json!({
            "posts": [
                { "post_id": "1", "is_active": 1, "title": "Root", "author_id": "1" },
                { "post_id": "2", "is_active": 1, "title": "Second" },
                { "post_id": "3", "is_active": 0, "title": "Draft" },
                { "post_id": "4", "is_active": 1, "title": "Scheduled", "publish_time": "2999-01-01 00:00:00" },
                { "post_id": "5", "is_active": 1, "title": "Fifth", "author_id": "2" },
                { "post_id": "6", "is_active": 1, "title": "Sixth", "author_id": "404" }
            ],
            "tags": [
                { "tag_id": "1", "is_active": 1, "title": "Rust" },
                { "tag_id": "2", "is_active": 0, "title": "Hidden" },
                { "tag_id": "3", "is_active": 1, "title": "Async" }
            ],
            "categories": [
                { "category_id": "1", "is_active": 1, "title": "News" },
                { "category_id": "2", "is_active": 0, "title": "Archive" }
            ],
            "authors": [
                { "author_id": "1", "is_active": 1, "firstname": "Jane" },
                { "author_id": "2", "is_active": 0, "firstname": "Gone" }
            ],
            "products": [
                { "entity_id": "1", "sku": "24-MB01" },
                { "entity_id": "2", "sku": "24-MB02" },
                { "entity_id": "3", "sku": "24-MB03" }
            ],
            "links": {
                "post_tags": { "1": ["3", "2", "1", "99"] },
                "post_categories": { "1": ["2", "1"] },
                "post_related_posts": { "1": ["2", "3", "4", "5", "6"] },
                "post_related_products": { "1": ["3", "1", "2"] }
            }
        })
    }

    fn repository() -> MemoryRepository {
        MemoryRepository::from_json(&fixture().to_string()).unwrap()
    }

    fn load_post(repository: &MemoryRepository, id: &str) -> Post {
        let mut post = Repository::<Post>::create(repository);
        repository.load(&mut post, id).unwrap();
        post
    }

    fn titles<E: Entity>(items: &[E]) -> Vec<&str> {
        items.iter().filter_map(|item| item.text("title")).collect()
    }

    #[test]
    fn test_load_hydrates_found_record() {
        let repository = repository();
        let post = load_post(&repository, "1");
        assert!(post.is_active());
        assert_eq!(post.text("title"), Some("Root"));
    }

    #[test]
    fn test_load_missing_leaves_entity_empty() {
        let repository = repository();
        let post = load_post(&repository, "404");
        assert!(post.data().is_empty());
        assert!(!post.is_active());
    }

    #[test]
    fn test_related_tags_keep_link_order_and_skip_inactive() {
        let repository = repository();
        let post = load_post(&repository, "1");
        let tags = repository.related_tags(&post).unwrap();
        assert_eq!(titles(&tags), vec!["Async", "Rust"]);
    }

    #[test]
    fn test_parent_categories_skip_inactive() {
        let repository = repository();
        let post = load_post(&repository, "1");
        let categories = repository.parent_categories(&post).unwrap();
        assert_eq!(titles(&categories), vec!["News"]);
    }

    #[test]
    fn test_author_relation() {
        let repository = repository();
        let with_author = load_post(&repository, "1");
        let inactive_author = load_post(&repository, "5");
        let dangling_author = load_post(&repository, "6");
        let no_author = load_post(&repository, "2");

        let author = repository.author(&with_author).unwrap().unwrap();
        assert_eq!(author.text("firstname"), Some("Jane"));
        assert!(repository.author(&inactive_author).unwrap().is_none());
        assert!(repository.author(&dangling_author).unwrap().is_none());
        assert!(repository.author(&no_author).unwrap().is_none());
    }

    #[test]
    fn test_related_posts_active_filter() {
        let repository = repository();
        let post = load_post(&repository, "1");

        let all = repository.related_posts(&post, CollectionQuery::new()).unwrap();
        assert_eq!(all.len(), 5);

        let active = repository
            .related_posts(&post, CollectionQuery::new().active())
            .unwrap();
        assert_eq!(titles(&active), vec!["Second", "Fifth", "Sixth"]);
    }

    #[test]
    fn test_related_posts_page_size_applies_after_filter() {
        let repository = repository();
        let post = load_post(&repository, "1");
        let active = repository
            .related_posts(&post, CollectionQuery::new().active().page_size(2))
            .unwrap();
        assert_eq!(titles(&active), vec!["Second", "Fifth"]);
    }

    #[test]
    fn test_scheduled_post_becomes_visible() {
        let repository = repository();
        let post = load_post(&repository, "1");
        let far_future = NaiveDate::from_ymd_opt(3000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let active = repository.related_posts_at(&post, CollectionQuery::new().active(), far_future);
        assert_eq!(titles(&active), vec!["Second", "Scheduled", "Fifth", "Sixth"]);
    }

    #[test]
    fn test_related_products_page_size() {
        let repository = repository();
        let post = load_post(&repository, "1");
        let products = repository
            .related_products(&post, CollectionQuery::new().page_size(2))
            .unwrap();
        let skus: Vec<_> = products.iter().map(|p| p.sku.as_str()).collect();
        assert_eq!(skus, vec!["24-MB03", "24-MB01"]);
    }

    #[test]
    fn test_post_without_links_has_empty_relations() {
        let repository = repository();
        let post = load_post(&repository, "2");
        assert!(repository.related_tags(&post).unwrap().is_empty());
        assert!(repository.parent_categories(&post).unwrap().is_empty());
        assert!(
            repository
                .related_posts(&post, CollectionQuery::new())
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_record_without_id_is_rejected() {
        let result = MemoryRepository::from_json(r#"{ "tags": [{ "title": "No id" }] }"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("tag record without `tag_id`"));
    }

    #[test]
    fn test_failed_replace_keeps_content() {
        let repository = repository();
        let fixture: Fixture =
            serde_json::from_value(json!({ "posts": [{ "title": "No id" }] })).unwrap();
        assert!(repository.replace(fixture).is_err());
        assert!(load_post(&repository, "1").is_active());
    }

    #[test]
    fn test_builder_methods() {
        let repository = MemoryRepository::new();
        repository
            .insert_post(serde_json::from_value(json!({ "post_id": 10, "is_active": true })).unwrap())
            .unwrap();
        repository
            .insert_tag(serde_json::from_value(json!({ "tag_id": 20, "is_active": true })).unwrap())
            .unwrap();
        repository.link_tags("10", ["20"]);

        let post = load_post(&repository, "10");
        assert_eq!(repository.related_tags(&post).unwrap().len(), 1);
    }

    #[test]
    fn test_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(fixture().to_string().as_bytes()).unwrap();

        let repository = MemoryRepository::from_path(file.path()).unwrap();
        assert!(load_post(&repository, "2").is_active());
    }
}
