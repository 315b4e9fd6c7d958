//! Persistence capability for the post list.
//!
//! A [`PostRepository`] loads and saves the whole list at once. `load` never
//! fails: a missing or unreadable value is an empty list.

use std::cell::RefCell;

use tracing::{debug, warn};

use crate::error::Result;
use crate::post::Post;
use crate::storage::Storage;

/// Whole-list persistence for posts.
pub trait PostRepository {
    /// Load the persisted list, or an empty list if absent or corrupt.
    fn load(&self) -> Vec<Post>;

    /// Overwrite the persisted list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be serialized or written.
    fn save(&self, posts: &[Post]) -> Result<()>;
}

/// Posts stored as a JSON array under one key of a [`Storage`].
#[derive(Debug)]
pub struct StoragePostRepository {
    storage: Storage,
    key: String,
}

impl StoragePostRepository {
    /// Wrap a storage, writing the list under `key`.
    #[must_use]
    pub fn new(storage: Storage, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The underlying storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The key the list is written under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PostRepository for StoragePostRepository {
    fn load(&self) -> Vec<Post> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No stored posts");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, "Failed to read stored posts: {e}");
                return Vec::new();
            }
        };
        parse_posts(&raw)
    }

    fn save(&self, posts: &[Post]) -> Result<()> {
        let raw = serde_json::to_string(posts)?;
        self.storage.set_item(&self.key, &raw)
    }
}

/// Posts held as a serialized string in memory.
///
/// Keeps the same serialize-on-save behaviour as the durable backend, so it
/// can stand in for it in tests and embeddings.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    raw: RefCell<Option<String>>,
}

impl InMemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository holding a raw stored value, as if written earlier.
    #[must_use]
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    /// The raw stored value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl PostRepository for InMemoryRepository {
    fn load(&self) -> Vec<Post> {
        self.raw.borrow().as_deref().map(parse_posts).unwrap_or_default()
    }

    fn save(&self, posts: &[Post]) -> Result<()> {
        let raw = serde_json::to_string(posts)?;
        *self.raw.borrow_mut() = Some(raw);
        Ok(())
    }
}

impl<R: PostRepository + ?Sized> PostRepository for &R {
    fn load(&self) -> Vec<Post> {
        (**self).load()
    }

    fn save(&self, posts: &[Post]) -> Result<()> {
        (**self).save(posts)
    }
}

fn parse_posts(raw: &str) -> Vec<Post> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Stored posts are not a valid post list, starting empty: {e}");
        Vec::new()
    })
}
