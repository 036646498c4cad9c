//! Category data provider.

use super::{ComputedField, Services, describe, insert_computed, text_value};
use crate::content::RenderEnv;
use crate::error::Result;
use crate::fields::{Fields, Selection};
use crate::model::{Category, DataMap, Entity};
use crate::repository::load_active;

/// Computed category fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryField {
    CategoryUrl,
    MetaTitle,
    MetaDescription,
    FilteredContent,
}

impl ComputedField for CategoryField {
    const ALL: &'static [Self] = &[
        Self::CategoryUrl,
        Self::MetaTitle,
        Self::MetaDescription,
        Self::FilteredContent,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::CategoryUrl => "category_url",
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::FilteredContent => "filtered_content",
        }
    }
}

#[derive(Clone)]
pub struct CategoryProvider {
    services: Services,
}

impl CategoryProvider {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn get_data(&self, category_id: &str, fields: Option<&Fields>) -> Result<DataMap> {
        let category = load_active::<Category, _>(self.services.repository.as_ref(), category_id)?;
        self.dynamic_data(&category, fields)
    }

    pub fn dynamic_data(&self, category: &Category, fields: Option<&Fields>) -> Result<DataMap> {
        let design = self.services.design.current();
        let urls = self.services.urls()?;
        self.materialize(category, Selection::from(fields), RenderEnv::new(&design, &urls))
    }

    pub(crate) fn materialize(
        &self,
        category: &Category,
        selection: Selection<'_>,
        env: RenderEnv<'_>,
    ) -> Result<DataMap> {
        let mut data = category.data().clone();
        let mut filtered: Option<String> = None;
        let mut render = || -> Result<String> {
            if let Some(filtered) = &filtered {
                return Ok(filtered.clone());
            }
            let rendered = match category.text("content") {
                Some(content) => self.services.filter.filter(content, &env)?,
                None => String::new(),
            };
            filtered = Some(rendered.clone());
            Ok(rendered)
        };

        insert_computed(&mut data, selection, |field: CategoryField| {
            let value = match field {
                CategoryField::CategoryUrl => Some(env.urls.category_url(category)),
                CategoryField::MetaTitle => category
                    .text("meta_title")
                    .or_else(|| category.text("title"))
                    .map(str::to_owned),
                CategoryField::MetaDescription => match category.text("meta_description") {
                    Some(description) => Some(description.to_owned()),
                    None => describe(&render()?),
                },
                CategoryField::FilteredContent => Some(render()?),
            };
            Ok(text_value(value))
        })?;

        Ok(data)
    }
}
