//! Rendering stored rich text into final HTML.
//!
//! Stored content embeds template directives (`{{media url="..."}}`) that only
//! resolve against store URLs and the active theme. A [`ContentFilter`] turns
//! such content into render-ready HTML under an explicit [`RenderEnv`].

mod directive;
pub mod html;

pub use directive::DirectiveFilter;

use crate::design::RenderContext;
use crate::url::UrlBuilder;
use anyhow::Result;

/// Everything a filter needs to resolve directives for one request.
#[derive(Debug, Clone, Copy)]
pub struct RenderEnv<'a> {
    pub design: &'a RenderContext,
    pub urls: &'a UrlBuilder,
}

impl<'a> RenderEnv<'a> {
    pub const fn new(design: &'a RenderContext, urls: &'a UrlBuilder) -> Self {
        Self { design, urls }
    }
}

/// Expands template directives in stored content.
pub trait ContentFilter: Send + Sync {
    fn filter(&self, content: &str, env: &RenderEnv<'_>) -> Result<String>;
}
