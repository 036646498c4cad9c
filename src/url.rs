//! Storefront URL building.
//!
//! URLs are resolved once per request from scoped config:
//!
//! | URL | Shape |
//! |-----|-------|
//! | post | `{base}{route}/{post_route}/{key}{suffix}` |
//! | tag / category / author | same with the matching sub-route |
//! | media | `{media}{path}` |
//! | view asset | `{static}{area}/{theme}/{locale}/{path}` |
//!
//! The URL key of an entity is its `identifier`, else its slugified title,
//! else its id.

use crate::config::{ConfigSource, Scope, keys};
use crate::design::RenderContext;
use crate::model::{Author, Category, Entity, Post, Tag};
use anyhow::Result;
use deunicode::deunicode;

/// URL prefixes and permalink settings for one store scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    base_url: String,
    canonical_base_url: String,
    media_url: String,
    static_url: String,
    locale: String,
    route: String,
    post_route: String,
    tag_route: String,
    category_route: String,
    author_route: String,
    suffix: String,
}

impl UrlBuilder {
    /// Read URL settings for `scope`.
    ///
    /// The canonical base always comes from the default scope.
    pub fn resolve(config: &dyn ConfigSource, scope: &Scope) -> Result<Self> {
        let read = |path: &str| -> Result<String> {
            Ok(config.value(path, scope)?.unwrap_or_default())
        };

        let base_url = with_trailing_slash(&read(keys::BASE_URL)?);
        let canonical_base_url = with_trailing_slash(
            &config
                .value(keys::BASE_URL, &Scope::Default)?
                .unwrap_or_else(|| base_url.clone()),
        );
        let media_url = match config.value(keys::MEDIA_URL, scope)? {
            Some(url) if !url.is_empty() => with_trailing_slash(&url),
            _ => format!("{base_url}media/"),
        };
        let static_url = match config.value(keys::STATIC_URL, scope)? {
            Some(url) if !url.is_empty() => with_trailing_slash(&url),
            _ => format!("{base_url}static/"),
        };

        Ok(Self {
            base_url,
            canonical_base_url,
            media_url,
            static_url,
            locale: read(keys::LOCALE)?,
            route: trim_slashes(&read(keys::ROUTE)?),
            post_route: trim_slashes(&read(keys::POST_ROUTE)?),
            tag_route: trim_slashes(&read(keys::TAG_ROUTE)?),
            category_route: trim_slashes(&read(keys::CATEGORY_ROUTE)?),
            author_route: trim_slashes(&read(keys::AUTHOR_ROUTE)?),
            suffix: read(keys::URL_SUFFIX)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn post_url(&self, post: &Post) -> String {
        self.entity_url(&self.base_url, &self.post_route, &url_key(post))
    }

    /// Post URL on the default-scope base URL.
    pub fn canonical_post_url(&self, post: &Post) -> String {
        self.entity_url(&self.canonical_base_url, &self.post_route, &url_key(post))
    }

    pub fn tag_url(&self, tag: &Tag) -> String {
        self.entity_url(&self.base_url, &self.tag_route, &url_key(tag))
    }

    pub fn category_url(&self, category: &Category) -> String {
        self.entity_url(&self.base_url, &self.category_route, &url_key(category))
    }

    pub fn author_url(&self, author: &Author) -> String {
        self.entity_url(&self.base_url, &self.author_route, &url_key(author))
    }

    /// URL of a file under the media directory. Absolute URLs pass through.
    pub fn media_url(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_owned();
        }
        format!("{}{}", self.media_url, path.trim_start_matches('/'))
    }

    /// URL of a store page.
    pub fn store_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// URL of a theme asset; unthemed contexts point at the static root.
    pub fn view_url(&self, path: &str, context: &RenderContext) -> String {
        let path = path.trim_start_matches('/');
        match &context.theme {
            Some(theme) => format!(
                "{}{}/{}/{}/{}",
                self.static_url, context.area, theme.code, self.locale, path
            ),
            None => format!("{}{}", self.static_url, path),
        }
    }

    fn entity_url(&self, base: &str, sub_route: &str, key: &str) -> String {
        let mut url = String::from(base);
        for segment in [self.route.as_str(), sub_route] {
            if !segment.is_empty() {
                url.push_str(segment);
                url.push('/');
            }
        }
        url.push_str(key);
        url.push_str(&self.suffix);
        url
    }
}

/// URL key of an entity.
pub fn url_key<E: Entity>(entity: &E) -> String {
    if let Some(identifier) = entity.identifier() {
        return identifier.to_owned();
    }
    entity
        .text("title")
        .map(slugify)
        .filter(|slug| !slug.is_empty())
        .or_else(|| entity.id())
        .unwrap_or_default()
}

/// Lowercase ASCII slug: transliterate, keep alphanumerics, join runs with `-`.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text).to_ascii_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    for part in ascii.split(|c: char| !c.is_ascii_alphanumeric()) {
        if part.is_empty() {
            continue;
        }
        if !slug.is_empty() {
            slug.push('-');
        }
        slug.push_str(part);
    }
    slug
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_owned()
    } else {
        format!("{url}/")
    }
}

fn trim_slashes(segment: &str) -> String {
    segment.trim_matches('/').to_owned()
}

fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}
