//! Text rendering of posts and form state.

use std::fmt::Write as _;

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::form::FormView;
use crate::image::decode_data_url;
use crate::post::Post;

/// Heading printed above the post list.
pub const POSTS_HEADING: &str = "All Posts";

/// Shown in place of the list when there are no posts.
pub const EMPTY_LIST_MESSAGE: &str = "No posts available. Create a new post to see it here.";

/// Column width for titles in table output.
const TITLE_WIDTH: usize = 24;

/// Render the post list.
///
/// With `show_images`, each image is printed as its full `data:` URL;
/// otherwise a one-line summary is shown.
///
/// # Errors
///
/// Returns an error if JSON output cannot be serialized.
pub fn render_posts(posts: &[Post], format: OutputFormat, show_images: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(posts)?),
        OutputFormat::Plain => Ok(render_plain(posts, show_images)),
        OutputFormat::Table => Ok(render_table(posts)),
    }
}

fn render_plain(posts: &[Post], show_images: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{POSTS_HEADING}");
    let _ = writeln!(out, "{}", "=".repeat(POSTS_HEADING.len()));

    if posts.is_empty() {
        let _ = writeln!(out, "{EMPTY_LIST_MESSAGE}");
        return out;
    }

    for post in posts {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", post.title);
        let _ = writeln!(out, "{}", post.description);
        if let Some(created) = post.created_at() {
            let _ = writeln!(out, "Posted {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
        }
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", post.content);
        if post.has_image() {
            if show_images {
                let _ = writeln!(out, "{}", post.image_url);
            } else {
                let _ = writeln!(out, "{}", image_summary(&post.image_url));
            }
        }
    }
    out
}

fn render_table(posts: &[Post]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<15} {:<width$} {}",
        "ID",
        "TITLE",
        "IMAGE",
        width = TITLE_WIDTH
    );
    for post in posts {
        let image = if post.has_image() {
            image_summary(&post.image_url)
        } else {
            "-".to_string()
        };
        let _ = writeln!(
            out,
            "{:<15} {:<width$} {}",
            post.id,
            truncate(&post.title, TITLE_WIDTH),
            image,
            width = TITLE_WIDTH
        );
    }
    out
}

/// Short description of an inlined image.
#[must_use]
pub fn image_summary(image_url: &str) -> String {
    match decode_data_url(image_url) {
        Some((mime, bytes)) => format!("[image: {}, {} bytes]", mime.essence_str(), bytes.len()),
        None => "[image: unreadable]".to_string(),
    }
}

/// Render the draft form: the error message if set, then the image preview.
#[must_use]
pub fn render_form(view: &FormView) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
    }
    if let Some(image) = &view.image {
        let _ = writeln!(
            out,
            "Image Preview: {} ({}, {} bytes)",
            image.name, image.mime, image.size
        );
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
