//! The post form controller.
//!
//! Holds the draft fields and the error slot, validates on submit, encodes the
//! selected image and appends the finished post to a [`PostStore`]. State is
//! explicit: callers read [`FormController::view`] after each step and render
//! it themselves.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::image::{encode_data_url, ImageFile, ImagePreview};
use crate::post::Post;
use crate::repository::PostRepository;
use crate::store::PostStore;

/// Message shown when any field is missing on submit.
pub const REQUIRED_FIELDS_MESSAGE: &str = "All fields are required!";

/// The text fields of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Post title.
    Title,
    /// Post description.
    Description,
    /// Post body.
    Content,
}

/// Outcome of a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The post was stored; carries a copy of it.
    Created(Post),
    /// A required field was missing; nothing was stored.
    Rejected,
}

/// Snapshot of the form for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Draft title.
    pub title: String,
    /// Draft description.
    pub description: String,
    /// Draft content.
    pub content: String,
    /// Preview of the selected image.
    pub image: Option<ImagePreview>,
    /// Current error message, if any.
    pub error: Option<String>,
}

/// Draft state for one post.
#[derive(Debug, Default)]
pub struct FormController {
    title: String,
    description: String,
    content: String,
    image: Option<ImageFile>,
    error: Option<String>,
}

impl FormController {
    /// Create an empty form.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite a text field. No validation happens here.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Description => self.description = value,
            Field::Content => self.content = value,
        }
    }

    /// Select or clear the image.
    pub fn set_image(&mut self, image: Option<ImageFile>) {
        self.image = image;
    }

    /// Current value of a text field.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Content => &self.content,
        }
    }

    /// The selected image, if any.
    #[must_use]
    pub fn image(&self) -> Option<&ImageFile> {
        self.image.as_ref()
    }

    /// Current error message.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Snapshot the form state.
    #[must_use]
    pub fn view(&self) -> FormView {
        FormView {
            title: self.title.clone(),
            description: self.description.clone(),
            content: self.content.clone(),
            image: self.image.as_ref().map(ImageFile::preview),
            error: self.error.clone(),
        }
    }

    /// Validate the draft and, if complete, store it as a new post.
    ///
    /// On a missing field the error slot is set and nothing else changes.
    /// On success the error is cleared, the image is encoded, the post is
    /// appended to `store`, and the draft is reset.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or persisting fails. In that case the
    /// draft is kept so the user can retry.
    pub async fn submit<R: PostRepository>(
        &mut self,
        store: &mut PostStore<R>,
    ) -> Result<SubmitOutcome> {
        let image = match &self.image {
            Some(image)
                if !self.title.is_empty()
                    && !self.description.is_empty()
                    && !self.content.is_empty() =>
            {
                image.clone()
            }
            _ => {
                debug!("Rejected submit with missing fields");
                self.error = Some(REQUIRED_FIELDS_MESSAGE.to_string());
                return Ok(SubmitOutcome::Rejected);
            }
        };
        self.error = None;

        let image_url = encode_data_url(image).await?;
        let post = Post::new(
            store.next_id(),
            self.title.clone(),
            self.description.clone(),
            self.content.clone(),
            image_url,
        );
        let created = store.append(post)?.clone();

        self.reset();
        Ok(SubmitOutcome::Created(created))
    }

    /// Like [`submit`](Self::submit), but a rejected draft is an
    /// [`Error::Validation`].
    ///
    /// # Errors
    ///
    /// Returns a validation error for a missing field, or any error from
    /// [`submit`](Self::submit).
    pub async fn submit_or_err<R: PostRepository>(
        &mut self,
        store: &mut PostStore<R>,
    ) -> Result<Post> {
        match self.submit(store).await? {
            SubmitOutcome::Created(post) => Ok(post),
            SubmitOutcome::Rejected => Err(Error::validation(REQUIRED_FIELDS_MESSAGE)),
        }
    }

    fn reset(&mut self) {
        self.title.clear();
        self.description.clear();
        self.content.clear();
        self.image = None;
    }
}
