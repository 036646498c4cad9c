//! Repository contracts and the visibility gate.
//!
//! The content backend is a collaborator: it constructs empty entities, loads
//! them by id, and answers relation queries. [`MemoryRepository`] is the
//! in-process implementation.

mod memory;

pub use memory::{Fixture, Links, MemoryRepository};

use crate::error::{DataError, Result};
use crate::model::{Author, Category, Entity, Post, Product, Tag};

/// Loads entities of one kind.
pub trait Repository<E: Entity>: Send + Sync {
    /// A new, unpopulated entity.
    fn create(&self) -> E {
        E::default()
    }

    /// Hydrate `entity` in place. A missing record leaves it empty (inactive).
    fn load(&self, entity: &mut E, id: &str) -> anyhow::Result<()>;
}

/// Constraints for paginated relation queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    /// Keep only active, already published records.
    pub active_only: bool,
    /// Maximum number of records; `None` returns all.
    pub page_size: Option<usize>,
}

impl CollectionQuery {
    pub const fn new() -> Self {
        Self {
            active_only: false,
            page_size: None,
        }
    }

    pub const fn active(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub const fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }
}

/// Relations of a post.
///
/// Collections come back in relation order. Tags and categories only include
/// active records; an inactive or missing author is `None`.
pub trait PostRelations: Send + Sync {
    fn related_tags(&self, post: &Post) -> anyhow::Result<Vec<Tag>>;

    fn parent_categories(&self, post: &Post) -> anyhow::Result<Vec<Category>>;

    fn author(&self, post: &Post) -> anyhow::Result<Option<Author>>;

    /// Curated related posts.
    fn related_posts(&self, post: &Post, query: CollectionQuery) -> anyhow::Result<Vec<Post>>;

    /// Catalog products linked to the post. `active_only` does not apply.
    fn related_products(
        &self,
        post: &Post,
        query: CollectionQuery,
    ) -> anyhow::Result<Vec<Product>>;
}

/// Everything the providers need from the content backend.
pub trait BlogRepository:
    Repository<Post> + Repository<Tag> + Repository<Category> + Repository<Author> + PostRelations
{
}

impl<T> BlogRepository for T where
    T: Repository<Post> + Repository<Tag> + Repository<Category> + Repository<Author> + PostRelations
{
}

/// Load an entity and reject it unless it is publicly visible.
///
/// Missing records and inactive records both fail with
/// [`DataError::NotFound`]; no partial entity is returned.
pub fn load_active<E, R>(repository: &R, id: &str) -> Result<E>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    let mut entity = repository.create();
    repository.load(&mut entity, id)?;

    if !entity.is_active() {
        return Err(DataError::not_found(E::KIND, id));
    }

    Ok(entity)
}
