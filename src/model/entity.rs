//! Post, tag, category and author records.

use super::{DataMap, Entity, EntityKind, scalar_string};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Storage format of `publish_time`.
const PUBLISH_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Declare an entity record backed by its attribute map.
macro_rules! entity {
    ($(#[$meta:meta])* $name:ident, $kind:expr, $id_field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            data: DataMap,
        }

        impl $name {
            pub fn from_data(data: DataMap) -> Self {
                Self { data }
            }
        }

        impl Entity for $name {
            const KIND: EntityKind = $kind;
            const ID_FIELD: &'static str = $id_field;

            fn data(&self) -> &DataMap {
                &self.data
            }

            fn data_mut(&mut self) -> &mut DataMap {
                &mut self.data
            }
        }
    };
}

entity!(
    /// A blog post.
    Post,
    EntityKind::Post,
    "post_id"
);

entity!(
    /// A free-form tag attached to posts.
    Tag,
    EntityKind::Tag,
    "tag_id"
);

entity!(
    /// A category posts are filed under.
    Category,
    EntityKind::Category,
    "category_id"
);

entity!(
    /// A post author.
    Author,
    EntityKind::Author,
    "author_id"
);

impl Post {
    /// Id of the author relation, if the post has one.
    pub fn author_id(&self) -> Option<String> {
        self.data.get("author_id").and_then(scalar_string)
    }

    /// Scheduled publication time; `None` when unset or unparsable.
    pub fn publish_time(&self) -> Option<NaiveDateTime> {
        self.text("publish_time")
            .and_then(|s| NaiveDateTime::parse_from_str(s, PUBLISH_TIME_FORMAT).ok())
    }

    /// Whether the post is published at `now` (no publish time means published).
    pub fn is_published_at(&self, now: NaiveDateTime) -> bool {
        self.publish_time().is_none_or(|time| time <= now)
    }
}

impl Author {
    /// Display name: stored `title`, else first and last name joined.
    pub fn display_name(&self) -> Option<String> {
        if let Some(title) = self.text("title") {
            return Some(title.to_owned());
        }

        let name = [self.text("firstname"), self.text("lastname")]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        (!name.is_empty()).then_some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_default_entity_is_inactive() {
        let post = Post::default();
        assert!(!post.is_active());
        assert_eq!(post.id(), None);
    }

    #[test]
    fn test_hydrate_replaces_data() {
        let mut tag = Tag::default();
        let data = json!({ "tag_id": 4, "is_active": "1", "title": "Rust" });
        tag.hydrate(data.as_object().unwrap().clone());

        assert!(tag.is_active());
        assert_eq!(tag.id(), Some("4".into()));
        assert_eq!(tag.text("title"), Some("Rust"));
    }

    #[test]
    fn test_transparent_serde() {
        let post = post(json!({ "post_id": "7", "is_active": true, "title": "Hello" }));
        assert_eq!(post.id(), Some("7".into()));
        assert_eq!(
            serde_json::to_value(&post).unwrap(),
            json!({ "post_id": "7", "is_active": true, "title": "Hello" })
        );
    }

    #[test]
    fn test_text_skips_blank_values() {
        let post = post(json!({ "meta_title": "  ", "title": "Hello", "count": 3 }));
        assert_eq!(post.text("meta_title"), None);
        assert_eq!(post.text("count"), None);
        assert_eq!(post.text("title"), Some("Hello"));
    }

    #[test]
    fn test_author_id() {
        assert_eq!(post(json!({ "author_id": 2 })).author_id(), Some("2".into()));
        assert_eq!(post(json!({ "author_id": null })).author_id(), None);
        assert_eq!(post(json!({})).author_id(), None);
    }

    #[test]
    fn test_publish_time() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();

        let past = post(json!({ "publish_time": "2024-05-01 08:00:00" }));
        let future = post(json!({ "publish_time": "2024-07-01 08:00:00" }));
        let unset = post(json!({}));
        let garbage = post(json!({ "publish_time": "soon" }));

        assert!(past.is_published_at(now));
        assert!(!future.is_published_at(now));
        assert!(unset.is_published_at(now));
        assert!(garbage.is_published_at(now));
    }

    #[test]
    fn test_author_display_name() {
        let titled: Author = serde_json::from_value(json!({ "title": "Jane D." })).unwrap();
        let named: Author =
            serde_json::from_value(json!({ "firstname": "Jane", "lastname": "Doe" })).unwrap();
        let anonymous = Author::default();

        assert_eq!(titled.display_name(), Some("Jane D.".into()));
        assert_eq!(named.display_name(), Some("Jane Doe".into()));
        assert_eq!(anonymous.display_name(), None);
    }
}
