//! Blog entities as loaded from the content repository.
//!
//! Entities are thin wrappers around their stored attribute map ("base data").
//! Attributes are kept verbatim so the providers can copy them into responses
//! unchanged; typed accessors read the handful of attributes the computed
//! fields need.

mod entity;
mod product;

pub use entity::{Author, Category, Post, Tag};
pub use product::Product;

use serde_json::Value;
use std::fmt;

/// Attribute map of an entity and of every materialized response object.
pub type DataMap = serde_json::Map<String, Value>;

/// Kind of blog entity, used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Post,
    Tag,
    Category,
    Author,
}

impl EntityKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Tag => "tag",
            Self::Category => "category",
            Self::Author => "author",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Common behavior of stored blog entities.
pub trait Entity: Default + Clone + Send + Sync {
    const KIND: EntityKind;

    /// Attribute holding the entity id.
    const ID_FIELD: &'static str;

    fn data(&self) -> &DataMap;

    fn data_mut(&mut self) -> &mut DataMap;

    /// Replace all attributes, as a repository load does.
    fn hydrate(&mut self, data: DataMap) {
        *self.data_mut() = data;
    }

    fn id(&self) -> Option<String> {
        self.data().get(Self::ID_FIELD).and_then(scalar_string)
    }

    /// Publication flag. An entity that was never hydrated is inactive.
    fn is_active(&self) -> bool {
        self.data().get("is_active").is_some_and(is_truthy)
    }

    /// Non-empty string attribute.
    fn text(&self, key: &str) -> Option<&str> {
        match self.data().get(key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        }
    }

    /// URL key, stored as `identifier`.
    fn identifier(&self) -> Option<&str> {
        self.text("identifier")
    }
}

/// String form of a scalar attribute (ids may be stored as numbers).
pub fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Truthiness of a stored flag: `true`, non-zero numbers, strings other than
/// `""` and `"0"`.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => crate::config::is_truthy(s),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
