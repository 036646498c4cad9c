//! Author data provider. Authors are always returned in full.

use super::{ComputedField, Services, insert_computed, text_value};
use crate::content::RenderEnv;
use crate::error::Result;
use crate::fields::Selection;
use crate::model::{Author, DataMap, Entity};
use crate::repository::load_active;

/// Computed author fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthorField {
    Title,
    Name,
    AuthorUrl,
    FeaturedImage,
}

impl ComputedField for AuthorField {
    const ALL: &'static [Self] = &[
        Self::Title,
        Self::Name,
        Self::AuthorUrl,
        Self::FeaturedImage,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Name => "name",
            Self::AuthorUrl => "author_url",
            Self::FeaturedImage => "featured_image",
        }
    }
}

#[derive(Clone)]
pub struct AuthorProvider {
    services: Services,
}

impl AuthorProvider {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn get_data(&self, author_id: &str) -> Result<DataMap> {
        let author = load_active::<Author, _>(self.services.repository.as_ref(), author_id)?;
        self.dynamic_data(&author)
    }

    pub fn dynamic_data(&self, author: &Author) -> Result<DataMap> {
        let design = self.services.design.current();
        let urls = self.services.urls()?;
        self.materialize(author, RenderEnv::new(&design, &urls))
    }

    pub(crate) fn materialize(&self, author: &Author, env: RenderEnv<'_>) -> Result<DataMap> {
        let mut data = author.data().clone();
        insert_computed(&mut data, Selection::all(), |field: AuthorField| {
            let value = match field {
                AuthorField::Title | AuthorField::Name => author.display_name(),
                AuthorField::AuthorUrl => Some(env.urls.author_url(author)),
                AuthorField::FeaturedImage => author
                    .text("featured_img")
                    .map(|path| env.urls.media_url(path)),
            };
            Ok(text_value(value))
        })?;
        Ok(data)
    }
}
