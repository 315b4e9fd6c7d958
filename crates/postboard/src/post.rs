//! Core post types for postboard.
//!
//! A [`Post`] is one user-submitted record. Its serialized shape is the
//! persisted layout: a flat JSON object with camelCase field names.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single post.
///
/// Missing fields deserialize to empty values, so records written by other
/// tools survive a load and rewrite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    /// Creation time in milliseconds since the Unix epoch.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Short description shown under the title.
    pub description: String,
    /// Body text.
    pub content: String,
    /// `data:` URL carrying the image MIME type and base64 payload.
    pub image_url: String,
}

impl Post {
    /// Create a post with an explicit identifier.
    #[must_use]
    pub fn new(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
        image_url: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            content: content.into(),
            image_url: image_url.into(),
        }
    }

    /// The creation time encoded in the identifier, if it is a valid timestamp.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.id).single()
    }

    /// Whether this post carries an inlined image.
    #[must_use]
    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}

/// Current wall-clock time in milliseconds, the base for new post identifiers.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post::new(
            1_700_000_000_000,
            "A",
            "B",
            "C",
            "data:image/png;base64,AAAA",
        )
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1_700_000_000_000_i64);
        assert_eq!(json["title"], "A");
        assert_eq!(json["imageUrl"], "data:image/png;base64,AAAA");
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn test_reads_browser_written_record() {
        let raw = r#"{"id":1714000000123,"title":"Hi","description":"d","content":"c","imageUrl":""}"#;
        let post: Post = serde_json::from_str(raw).unwrap();
        assert_eq!(post.id, 1_714_000_000_123);
        assert_eq!(post.title, "Hi");
        assert!(!post.has_image());
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let post: Post = serde_json::from_str(r#"{"id":1,"title":"old"}"#).unwrap();
        assert_eq!(post.id, 1);
        assert_eq!(post.title, "old");
        assert!(post.description.is_empty());
        assert!(!post.has_image());
    }

    #[test]
    fn test_created_at_matches_id() {
        let created = sample().created_at().unwrap();
        assert_eq!(created.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_has_image() {
        assert!(sample().has_image());
    }

    #[test]
    fn test_now_millis_is_recent() {
        let before = Utc::now().timestamp_millis();
        let now = now_millis();
        assert!(now >= before);
    }
}
