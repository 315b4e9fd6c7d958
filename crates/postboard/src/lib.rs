//! `postboard` - create and browse posts with inlined images, stored locally
//!
//! A post is a title, description, content and an image carried as a `data:`
//! URL. Posts are kept as one JSON list in a local key-value store, loaded
//! once at start-up and rewritten in full after each new post.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod image;
pub mod logging;
pub mod post;
pub mod render;
pub mod repository;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use form::{Field, FormController, FormView, SubmitOutcome, REQUIRED_FIELDS_MESSAGE};
pub use image::ImageFile;
pub use logging::init_logging;
pub use post::Post;
pub use repository::{InMemoryRepository, PostRepository, StoragePostRepository};
pub use storage::{Storage, StorageStats};
pub use store::PostStore;
