//! Field-selection trees.
//!
//! A resolver passes the output fields it wants as a sparse tree. Presence of a
//! key selects the field; the value is the selection for that field's own
//! sub-fields, where `null` means "everything".
//!
//! ```json
//! { "title": null, "tags": null, "related_posts": { "tags": null } }
//! ```
//!
//! A missing tree (`Option<&Fields>::None`) selects every field at every level,
//! except fields that must be named explicitly (see [`Selection::names`]).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A concrete selection of fields at one level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Option<Fields>>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `key` with all of its sub-fields.
    pub fn with(mut self, key: impl Into<String>) -> Self {
        self.0.insert(key.into(), None);
        self
    }

    /// Select `key` restricted to `nested` sub-fields.
    pub fn with_nested(mut self, key: impl Into<String>, nested: Fields) -> Self {
        self.0.insert(key.into(), Some(nested));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sub-selection for `key`, `None` if absent or unrestricted.
    pub fn get(&self, key: &str) -> Option<&Fields> {
        self.0.get(key).and_then(Option::as_ref)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<K> for Fields {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

/// Borrowed view answering "is this field wanted?" for one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection<'a>(Option<&'a Fields>);

impl<'a> Selection<'a> {
    /// Everything, recursively.
    pub const fn all() -> Self {
        Self(None)
    }

    pub const fn of(fields: &'a Fields) -> Self {
        Self(Some(fields))
    }

    pub const fn from_option(fields: Option<&'a Fields>) -> Self {
        Self(fields)
    }

    pub const fn is_unbounded(self) -> bool {
        self.0.is_none()
    }

    /// Field is selected: unbounded selection or key present.
    pub fn includes(self, key: &str) -> bool {
        self.0.is_none_or(|fields| fields.contains(key))
    }

    /// Field is named explicitly in a concrete selection.
    ///
    /// Used for opt-in fields that an unbounded selection never materializes.
    pub fn names(self, key: &str) -> bool {
        self.0.is_some_and(|fields| fields.contains(key))
    }

    /// Selection to recurse with for `key`.
    pub fn nested(self, key: &str) -> Selection<'a> {
        Self(self.0.and_then(|fields| fields.get(key)))
    }

    pub const fn fields(self) -> Option<&'a Fields> {
        self.0
    }
}

impl<'a> From<Option<&'a Fields>> for Selection<'a> {
    fn from(fields: Option<&'a Fields>) -> Self {
        Self(fields)
    }
}

impl<'a> From<&'a Fields> for Selection<'a> {
    fn from(fields: &'a Fields) -> Self {
        Self(Some(fields))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_nested_tree() {
        let fields: Fields = serde_json::from_str(
            r#"{ "title": null, "related_posts": { "tags": null } }"#,
        )
        .unwrap();

        assert!(fields.contains("title"));
        assert!(fields.get("title").is_none());
        assert!(fields.get("related_posts").unwrap().contains("tags"));
        assert_eq!(fields.keys().collect::<Vec<_>>(), vec!["related_posts", "title"]);
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let fields = Fields::new()
            .with("tags")
            .with_nested("categories", Fields::from_iter(["title"]));
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "tags": null, "categories": { "title": null } })
        );
    }

    #[test]
    fn test_unbounded_selection() {
        let all = Selection::all();
        assert!(all.is_unbounded());
        assert!(all.includes("tags"));
        assert!(!all.names("related_posts"));
        assert!(all.nested("categories").is_unbounded());
    }

    #[test]
    fn test_concrete_selection() {
        let fields = Fields::new()
            .with("tags")
            .with_nested("related_posts", Fields::new().with("author"));
        let selection = Selection::of(&fields);

        assert!(selection.includes("tags"));
        assert!(!selection.includes("categories"));
        assert!(selection.names("related_posts"));
        assert!(!selection.names("canonical_url"));

        let nested = selection.nested("related_posts");
        assert!(nested.includes("author"));
        assert!(!nested.includes("tags"));

        // `tags` maps to null: recurse with everything
        assert!(selection.nested("tags").is_unbounded());
    }

    #[test]
    fn test_empty_concrete_selection_selects_nothing() {
        let fields = Fields::new();
        let selection = Selection::of(&fields);
        assert!(fields.is_empty());
        assert!(!selection.includes("tags"));
        assert!(!selection.is_unbounded());
    }
}
