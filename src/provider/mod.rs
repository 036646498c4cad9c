//! Data providers: load an entity, check visibility, materialize fields.
//!
//! # Architecture
//!
//! ```text
//! resolver ──► BlogData::post(id, fields)
//!                  │
//!                  ├── load_active()          (NotFound gate)
//!                  └── PostProvider::materialize(post, selection)
//!                          │
//!                          ├── base data + selected computed fields
//!                          ├── tags        ──► TagProvider      (full data)
//!                          ├── related     ──► materialize()    (recursive, depth bounded)
//!                          ├── categories  ──► CategoryProvider (nested selection)
//!                          └── author      ──► AuthorProvider   (full data)
//! ```
//!
//! Providers never catch collaborator errors: the first failure aborts the
//! whole response.

mod author;
mod category;
mod post;
mod tag;
#[cfg(test)]
pub(crate) mod testing;

pub use author::{AuthorField, AuthorProvider};
pub use category::{CategoryField, CategoryProvider};
pub use post::{PostField, PostProvider};
pub use tag::{TagField, TagProvider};

use crate::config::{ConfigHandle, ConfigSource, Scope};
use crate::content::{ContentFilter, DirectiveFilter, html};
use crate::design::{DesignState, ThemeProvider};
use crate::error::Result;
use crate::fields::{Fields, Selection};
use crate::model::DataMap;
use crate::repository::BlogRepository;
use crate::url::UrlBuilder;
use serde_json::Value;
use std::sync::Arc;

/// Maximum length of a meta description derived from content.
const META_DESCRIPTION_LENGTH: usize = 160;

// ============================================================================
// Services
// ============================================================================

/// Collaborators shared by all providers of one store scope.
#[derive(Clone)]
pub struct Services {
    pub repository: Arc<dyn BlogRepository>,
    pub config: Arc<dyn ConfigSource>,
    pub filter: Arc<dyn ContentFilter>,
    pub themes: Arc<dyn ThemeProvider>,
    pub design: Arc<DesignState>,
    pub scope: Scope,
}

impl Services {
    /// Services reading config and themes from `config`, filtering content
    /// with [`DirectiveFilter`] under a fresh design state.
    pub fn new(repository: Arc<dyn BlogRepository>, config: Arc<ConfigHandle>) -> Self {
        Self {
            repository,
            config: config.clone(),
            filter: Arc::new(DirectiveFilter::new()),
            themes: config,
            design: Arc::new(DesignState::default()),
            scope: Scope::Default,
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_filter(mut self, filter: Arc<dyn ContentFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_design(mut self, design: Arc<DesignState>) -> Self {
        self.design = design;
        self
    }

    pub fn with_config(mut self, config: Arc<dyn ConfigSource>) -> Self {
        self.config = config;
        self
    }

    pub fn with_themes(mut self, themes: Arc<dyn ThemeProvider>) -> Self {
        self.themes = themes;
        self
    }

    /// URL settings for the current scope.
    pub(crate) fn urls(&self) -> Result<UrlBuilder> {
        Ok(UrlBuilder::resolve(self.config.as_ref(), &self.scope)?)
    }
}

// ============================================================================
// Computed Fields
// ============================================================================

/// Closed set of computed fields of one entity kind.
pub trait ComputedField: Copy + 'static {
    /// Every field, in output order.
    const ALL: &'static [Self];

    /// Response key of the field.
    fn key(self) -> &'static str;
}

/// Insert each computed field `selection` includes. Unselected fields are
/// never computed.
fn insert_computed<F: ComputedField>(
    data: &mut DataMap,
    selection: Selection<'_>,
    mut compute: impl FnMut(F) -> Result<Value>,
) -> Result<()> {
    for &field in F::ALL {
        if selection.includes(field.key()) {
            data.insert(field.key().to_owned(), compute(field)?);
        }
    }
    Ok(())
}

/// `Some(s)` as a JSON string, `None` as null.
fn text_value(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

/// Meta description derived from rendered HTML.
fn describe(html: &str) -> Option<String> {
    let text = html::strip_tags(html);
    let text = html::truncate_chars(&text, META_DESCRIPTION_LENGTH).trim_end();
    (!text.is_empty()).then(|| text.to_owned())
}

// ============================================================================
// Facade
// ============================================================================

/// All providers wired to one set of services.
///
/// # Example
///
/// ```ignore
/// let data = BlogData::new(Services::new(repository, config));
/// let fields: Fields = serde_json::from_str(r#"{ "title": null, "tags": null }"#)?;
/// let post = data.post("42", Some(&fields))?;
/// ```
#[derive(Clone)]
pub struct BlogData {
    post: PostProvider,
}

impl BlogData {
    pub fn new(services: Services) -> Self {
        Self {
            post: PostProvider::new(services),
        }
    }

    /// Field-filtered data of an active post.
    pub fn post(&self, post_id: &str, fields: Option<&Fields>) -> Result<DataMap> {
        self.post.get_data(post_id, fields)
    }

    /// Full data of an active tag, rendered under the storefront theme.
    pub fn tag(&self, tag_id: &str) -> Result<DataMap> {
        self.post.tags().get_data(tag_id)
    }

    /// Field-filtered data of an active category.
    pub fn category(&self, category_id: &str, fields: Option<&Fields>) -> Result<DataMap> {
        self.post.categories().get_data(category_id, fields)
    }

    /// Full data of an active author.
    pub fn author(&self, author_id: &str) -> Result<DataMap> {
        self.post.authors().get_data(author_id)
    }

    pub fn post_provider(&self) -> &PostProvider {
        &self.post
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{self, FIXTURE_CONFIG};
    use super::*;
    use serde_json::json;

    #[test]
    fn test_describe_strips_and_truncates() {
        let long = format!("<p>{}</p>", "word ".repeat(100));
        let description = describe(&long).unwrap();
        assert!(description.len() <= META_DESCRIPTION_LENGTH);
        assert!(!description.contains('<'));
        assert!(!description.ends_with(' '));
        assert_eq!(describe("<p> </p>"), None);
    }

    #[test]
    fn test_text_value() {
        assert_eq!(text_value(Some("a".into())), json!("a"));
        assert_eq!(text_value(None), Value::Null);
    }

    #[test]
    fn test_facade_routes_to_providers() {
        let data = BlogData::new(testing::services(FIXTURE_CONFIG));
        let fields = Fields::new().with("meta_title");

        assert_eq!(data.post("1", Some(&fields)).unwrap()["meta_title"], json!("Hello World"));
        assert_eq!(data.tag("1").unwrap()["title"], json!("Rust"));
        assert_eq!(data.category("1", None).unwrap()["title"], json!("News"));
        assert_eq!(data.author("1").unwrap()["name"], json!("Jane Doe"));
    }

    #[test]
    fn test_facade_not_found_for_every_kind() {
        let data = BlogData::new(testing::services(FIXTURE_CONFIG));

        assert!(data.post("4", None).unwrap_err().is_not_found());
        assert!(data.tag("3").unwrap_err().is_not_found());
        assert!(data.category("2", None).unwrap_err().is_not_found());
        assert!(data.author("2").unwrap_err().is_not_found());
        assert!(data.post("404", None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_store_scope_changes_urls() {
        let services = testing::services(FIXTURE_CONFIG).with_scope(Scope::store("german"));
        let data = BlogData::new(services);
        let fields = Fields::new().with("post_url");

        assert_eq!(
            data.post("1", Some(&fields)).unwrap()["post_url"],
            json!("https://shop.example.com/de/blog/post/hello-world.html")
        );
    }
}
