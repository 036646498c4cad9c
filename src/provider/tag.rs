//! Tag data provider.
//!
//! A tag requested on its own is rendered under the storefront design: its
//! content may reference theme assets, which only resolve once the configured
//! theme is installed for the frontend area.

use super::{ComputedField, Services, describe, insert_computed, text_value};
use crate::config::keys;
use crate::content::RenderEnv;
use crate::design::Area;
use crate::error::Result;
use crate::fields::Selection;
use crate::model::{DataMap, Entity, Tag};
use crate::repository::load_active;

/// Computed tag fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagField {
    TagUrl,
    MetaTitle,
    MetaDescription,
    FilteredContent,
}

impl ComputedField for TagField {
    const ALL: &'static [Self] = &[
        Self::TagUrl,
        Self::MetaTitle,
        Self::MetaDescription,
        Self::FilteredContent,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::TagUrl => "tag_url",
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::FilteredContent => "filtered_content",
        }
    }
}

#[derive(Clone)]
pub struct TagProvider {
    services: Services,
}

impl TagProvider {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Full data of an active tag, rendered under the frontend theme.
    ///
    /// The previous design context is restored before this returns, whether
    /// materialization succeeded or not.
    pub fn get_data(&self, tag_id: &str) -> Result<DataMap> {
        let tag = load_active::<Tag, _>(self.services.repository.as_ref(), tag_id)?;
        let urls = self.services.urls()?;

        let mut emulation = self.services.design.emulate(Area::Frontend);
        let theme_id = self
            .services
            .config
            .value(keys::THEME_ID, &self.services.scope)?
            .filter(|id| !id.trim().is_empty());
        if let Some(theme_id) = theme_id {
            emulation.set_theme(self.services.themes.theme_by_id(&theme_id)?);
        }

        self.materialize(&tag, RenderEnv::new(emulation.context(), &urls))
    }

    /// Full data of a loaded tag under the active design context.
    pub fn dynamic_data(&self, tag: &Tag) -> Result<DataMap> {
        let design = self.services.design.current();
        let urls = self.services.urls()?;
        self.materialize(tag, RenderEnv::new(&design, &urls))
    }

    pub(crate) fn materialize(&self, tag: &Tag, env: RenderEnv<'_>) -> Result<DataMap> {
        let mut data = tag.data().clone();
        let mut filtered: Option<String> = None;

        insert_computed(&mut data, Selection::all(), |field: TagField| {
            let value = match field {
                TagField::TagUrl => Some(env.urls.tag_url(tag)),
                TagField::MetaTitle => tag
                    .text("meta_title")
                    .or_else(|| tag.text("title"))
                    .map(str::to_owned),
                TagField::MetaDescription => match tag.text("meta_description") {
                    Some(description) => Some(description.to_owned()),
                    None => describe(&self.filtered(tag, env, &mut filtered)?),
                },
                TagField::FilteredContent => Some(self.filtered(tag, env, &mut filtered)?),
            };
            Ok(text_value(value))
        })?;

        Ok(data)
    }

    fn filtered(&self, tag: &Tag, env: RenderEnv<'_>, cache: &mut Option<String>) -> Result<String> {
        if let Some(filtered) = cache {
            return Ok(filtered.clone());
        }
        let filtered = match tag.text("content") {
            Some(content) => self.services.filter.filter(content, &env)?,
            None => String::new(),
        };
        *cache = Some(filtered.clone());
        Ok(filtered)
    }
}
