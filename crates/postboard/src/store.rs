//! The post store.
//!
//! Owns the authoritative in-memory list and keeps the persisted copy in step
//! by overwriting it after every append.

use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::post::{now_millis, Post};
use crate::repository::{PostRepository, StoragePostRepository};
use crate::storage::Storage;

/// Append-only list of posts backed by a [`PostRepository`].
#[derive(Debug)]
pub struct PostStore<R> {
    repo: R,
    posts: Vec<Post>,
}

impl<R: PostRepository> PostStore<R> {
    /// Create an empty store. Call [`hydrate`](Self::hydrate) to load the
    /// persisted list.
    #[must_use]
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            posts: Vec::new(),
        }
    }

    /// Create a store and load the persisted list.
    #[must_use]
    pub fn open(repo: R) -> Self {
        let mut store = Self::new(repo);
        store.hydrate();
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// A missing or unreadable value yields an empty list.
    pub fn hydrate(&mut self) {
        self.posts = self.repo.load();
        info!("Loaded {} posts", self.posts.len());
    }

    /// Append a post and overwrite the persisted list.
    ///
    /// The in-memory list is updated first; if the write fails the two
    /// copies diverge until the next successful append.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be serialized or written.
    pub fn append(&mut self, post: Post) -> Result<&Post> {
        let mut updated = self.posts.clone();
        updated.push(post);
        self.posts = updated;

        if let Err(e) = self.repo.save(&self.posts) {
            warn!("Failed to persist {} posts: {e}", self.posts.len());
            return Err(e);
        }

        let post = &self.posts[self.posts.len() - 1];
        info!(id = post.id, "Appended post {:?}", post.title);
        Ok(post)
    }

    /// Identifier for the next post: the current time in milliseconds, bumped
    /// past the newest existing id so ids stay strictly increasing.
    #[must_use]
    pub fn next_id(&self) -> i64 {
        let now = now_millis();
        match self.posts.iter().map(|p| p.id).max() {
            Some(last) if last >= now => last.saturating_add(1),
            _ => now,
        }
    }

    /// All posts in insertion order.
    #[must_use]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Number of posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether there are no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// The backing repository.
    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repo
    }
}

impl PostStore<StoragePostRepository> {
    /// Open the configured database and load the persisted list.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open_configured(config: &Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        let repo = StoragePostRepository::new(storage, config.storage.posts_key.clone());
        Ok(Self::open(repo))
    }
}
