//! blogql - data layer behind a blog GraphQL schema.
//!
//! Given an entity id and the fields a resolver asked for, the providers load
//! the entity, reject it unless it is publicly visible, and assemble a
//! field-filtered map, expanding related entities only when requested.
//!
//! ```ignore
//! let config = Arc::new(ConfigHandle::open(Path::new(CONFIG_FILE))?);
//! let repository = Arc::new(MemoryRepository::from_path(Path::new("blog.json"))?);
//! let data = BlogData::new(Services::new(repository, config));
//!
//! let fields: Fields = serde_json::from_str(r#"{ "title": null, "tags": null }"#)?;
//! let post = data.post("1", Some(&fields))?;
//! ```

pub mod logger;

pub mod config;
pub mod content;
pub mod design;
pub mod error;
pub mod fields;
pub mod model;
pub mod provider;
pub mod repository;
pub mod url;

pub use config::{BlogConfig, CONFIG_FILE, ConfigHandle, ConfigSource, Scope};
pub use content::{ContentFilter, DirectiveFilter, RenderEnv};
pub use design::{Area, DesignState, RenderContext, Theme, ThemeProvider};
pub use error::{DataError, Result};
pub use fields::{Fields, Selection};
pub use model::{Author, Category, DataMap, Entity, EntityKind, Post, Product, Tag};
pub use provider::{BlogData, PostProvider, Services};
pub use repository::{BlogRepository, CollectionQuery, MemoryRepository, Repository};
