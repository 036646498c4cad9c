//! Template directive expansion.
//!
//! | Directive | Output |
//! |-----------|--------|
//! | `{{media url="path"}}` | media URL of `path` |
//! | `{{store url="path"}}`, `{{store direct_url="path"}}` | store URL of `path` |
//! | `{{view url="path"}}` | theme asset URL of `path` |
//! | `{{widget ...}}` | removed |
//!
//! Other directives are left untouched. A known directive without a `url`
//! parameter expands to nothing.

use super::{ContentFilter, RenderEnv};
use anyhow::Result;
use regex::{Captures, Regex};
use std::{borrow::Cow, sync::LazyLock};

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_]+)([^}]*)\}\}").expect("directive pattern is valid")
});

static PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_]+)\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("param pattern is valid")
});

/// Default [`ContentFilter`] for stored blog content.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectiveFilter;

impl DirectiveFilter {
    pub const fn new() -> Self {
        Self
    }

    fn expand<'c>(&self, caps: &'c Captures<'_>, env: &RenderEnv<'_>) -> Cow<'c, str> {
        let name = caps[1].to_ascii_lowercase();
        let params = &caps[2];

        let expanded = match name.as_str() {
            "media" => param(params, "url").map(|url| env.urls.media_url(&url)),
            "store" => param(params, "url")
                .or_else(|| param(params, "direct_url"))
                .map(|url| env.urls.store_url(&url)),
            "view" => param(params, "url").map(|url| env.urls.view_url(&url, env.design)),
            "widget" => None,
            _ => return Cow::Borrowed(&caps[0]),
        };

        Cow::Owned(expanded.unwrap_or_default())
    }
}

impl ContentFilter for DirectiveFilter {
    fn filter(&self, content: &str, env: &RenderEnv<'_>) -> Result<String> {
        let rendered = DIRECTIVE.replace_all(content, |caps: &Captures<'_>| {
            self.expand(caps, env).into_owned()
        });
        Ok(rendered.into_owned())
    }
}

/// Value of directive parameter `key`.
fn param(params: &str, key: &str) -> Option<String> {
    PARAM
        .captures_iter(params)
        .find(|caps| &caps[1] == key)
        .and_then(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|m| m.as_str().to_owned())
}
