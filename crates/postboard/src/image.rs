//! Image selection and `data:` URL encoding.
//!
//! An [`ImageFile`] is the handle a user selects for a post: the file name,
//! its detected MIME type and its bytes. Encoding turns the handle into a
//! self-describing `data:<mime>;base64,<payload>` string that can be used
//! directly as an image source.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};
use mime::Mime;
use serde::Serialize;
use tracing::debug;

use crate::config::ImageConfig;
use crate::error::{Error, Result};

/// Magic-byte signatures for the image formats we recognise.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
];

/// Extension fallbacks, used when the content has no known signature.
const EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("ico", "image/x-icon"),
    ("svg", "image/svg+xml"),
    ("avif", "image/avif"),
];

/// A selected image file.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    mime: Mime,
    bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageFile")
            .field("name", &self.name)
            .field("mime", &self.mime.essence_str())
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Metadata about a selected image, shown before the post is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePreview {
    /// File name of the selected image.
    pub name: String,
    /// Detected MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: usize,
}

impl ImageFile {
    /// Create a handle with an explicit MIME type.
    #[must_use]
    pub fn new(name: impl Into<String>, mime: Mime, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime,
            bytes,
        }
    }

    /// Create a handle, detecting the MIME type from content and file name.
    #[must_use]
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = detect_mime(&name, &bytes);
        Self { name, mime, bytes }
    }

    /// Read an image from disk, enforcing the configured accept pattern and
    /// size limit.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not accepted by
    /// `config.accept`, or exceeds `config.max_bytes`.
    pub async fn open(path: impl AsRef<Path>, config: &ImageConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| Error::ImageRead {
                path: path.to_path_buf(),
                source,
            })?;

        if config.max_bytes > 0 && bytes.len() > config.max_bytes {
            return Err(Error::ImageTooLarge {
                path: path.to_path_buf(),
                size: bytes.len(),
                limit: config.max_bytes,
            });
        }

        let name = path
            .file_name()
            .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
        let file = Self::from_bytes(name, bytes);

        if !accepts(&config.accept, &file.name, &file.mime) {
            return Err(Error::ImageRejected {
                path: path.to_path_buf(),
                mime: file.mime.essence_str().to_string(),
            });
        }

        debug!(
            "Selected image {} ({}, {} bytes)",
            file.name,
            file.mime,
            file.bytes.len()
        );
        Ok(file)
    }

    /// File name of the image.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detected or declared MIME type.
    #[must_use]
    pub fn mime(&self) -> &Mime {
        &self.mime
    }

    /// Raw image bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size of the image in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Preview metadata for the draft view.
    #[must_use]
    pub fn preview(&self) -> ImagePreview {
        ImagePreview {
            name: self.name.clone(),
            mime: self.mime.essence_str().to_string(),
            size: self.bytes.len(),
        }
    }

    /// Encode the image as a `data:` URL.
    #[must_use]
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime.essence_str(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Encode an image off the async executor.
///
/// # Errors
///
/// Returns an internal error only if the encoding task panics.
pub async fn encode_data_url(file: ImageFile) -> Result<String> {
    tokio::task::spawn_blocking(move || file.to_data_url())
        .await
        .map_err(|e| Error::internal(format!("image encoding task failed: {e}")))
}

/// Split a `data:` URL into its MIME type and decoded payload.
///
/// Returns `None` if the string is not a base64 `data:` URL.
#[must_use]
pub fn decode_data_url(url: &str) -> Option<(Mime, Vec<u8>)> {
    let rest = url.strip_prefix("data:")?;
    let (header, payload) = rest.split_once(',')?;
    let mime_str = header.strip_suffix(";base64")?;
    let mime = mime_str.parse().ok()?;
    let bytes = STANDARD.decode(payload).ok()?;
    Some((mime, bytes))
}

/// Detect the MIME type of an image from its content, falling back to the
/// file extension and finally to `application/octet-stream`.
#[must_use]
pub fn detect_mime(name: &str, bytes: &[u8]) -> Mime {
    let sniffed = SIGNATURES
        .iter()
        .find(|(magic, _)| bytes.starts_with(magic))
        .map(|(_, mime)| *mime)
        .or_else(|| is_webp(bytes).then_some("image/webp"));

    let by_extension = || {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, mime)| *mime)
    };

    sniffed
        .or_else(by_extension)
        .and_then(|m| m.parse().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
}

fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

/// Check a file against an HTML-style `accept` list.
///
/// The list is comma separated; each entry is `*/*`, a `type/*` wildcard, an
/// exact MIME type, or a `.ext` file extension.
#[must_use]
pub fn accepts(accept: &str, name: &str, mime: &Mime) -> bool {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    accept.split(',').map(str::trim).any(|entry| {
        if let Some(wanted) = entry.strip_prefix('.') {
            return ext.as_deref() == Some(wanted.to_ascii_lowercase().as_str());
        }
        match entry.split_once('/') {
            Some(("*", "*")) => true,
            Some((ty, "*")) => mime.type_().as_str().eq_ignore_ascii_case(ty),
            Some(_) => mime.essence_str().eq_ignore_ascii_case(entry),
            None => false,
        }
    })
}

/// Check that an `accept` list is well formed.
///
/// # Errors
///
/// Returns a configuration error naming the first malformed entry.
pub fn validate_accept(accept: &str) -> Result<()> {
    if accept.trim().is_empty() {
        return Err(Error::ConfigValidation {
            message: "images.accept must not be empty".to_string(),
        });
    }
    for entry in accept.split(',').map(str::trim) {
        let ok = if let Some(ext) = entry.strip_prefix('.') {
            !ext.is_empty()
        } else {
            matches!(entry.split_once('/'), Some((ty, sub)) if !ty.is_empty() && !sub.is_empty())
        };
        if !ok {
            return Err(Error::ConfigValidation {
                message: format!("invalid accept entry: {entry:?}"),
            });
        }
    }
    Ok(())
}

/// A 1x1 transparent PNG.
#[cfg(test)]
pub(crate) const ONE_PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[cfg(test)]
mod tests {
    use super::*;

    fn png() -> ImageFile {
        ImageFile::from_bytes("pixel.png", ONE_PIXEL_PNG.to_vec())
    }

    #[test]
    fn test_detect_png_by_signature() {
        assert_eq!(detect_mime("whatever.bin", ONE_PIXEL_PNG), mime::IMAGE_PNG);
    }

    #[test]
    fn test_detect_jpeg_and_gif() {
        assert_eq!(detect_mime("x", b"\xff\xd8\xff\xe0rest"), mime::IMAGE_JPEG);
        assert_eq!(detect_mime("x", b"GIF89a...."), mime::IMAGE_GIF);
    }

    #[test]
    fn test_detect_webp() {
        let bytes = b"RIFF\x10\x00\x00\x00WEBPVP8 ";
        assert_eq!(detect_mime("x", bytes).essence_str(), "image/webp");
    }

    #[test]
    fn test_detect_falls_back_to_extension() {
        let mime = detect_mime("drawing.SVG", b"<svg xmlns=...>");
        assert_eq!(mime.essence_str(), "image/svg+xml");
    }

    #[test]
    fn test_detect_unknown_is_octet_stream() {
        assert_eq!(
            detect_mime("notes.txt", b"hello"),
            mime::APPLICATION_OCTET_STREAM
        );
    }

    #[test]
    fn test_data_url_declares_mime_and_payload() {
        let url = png().to_data_url();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_decode_data_url() {
        let url = png().to_data_url();
        let (mime, bytes) = decode_data_url(&url).unwrap();
        assert_eq!(mime, mime::IMAGE_PNG);
        assert_eq!(bytes, ONE_PIXEL_PNG);
    }

    #[test]
    fn test_decode_rejects_non_data_url() {
        assert!(decode_data_url("https://example.com/a.png").is_none());
        assert!(decode_data_url("data:image/png,rawtext").is_none());
        assert!(decode_data_url("").is_none());
    }

    #[tokio::test]
    async fn test_encode_data_url_async() {
        let url = encode_data_url(png()).await.unwrap();
        assert_eq!(url, png().to_data_url());
    }

    #[test]
    fn test_preview() {
        let preview = png().preview();
        assert_eq!(preview.name, "pixel.png");
        assert_eq!(preview.mime, "image/png");
        assert_eq!(preview.size, ONE_PIXEL_PNG.len());
    }

    #[test]
    fn test_debug_omits_bytes() {
        let debug_str = format!("{:?}", png());
        assert!(debug_str.contains("pixel.png"));
        assert!(debug_str.contains("image/png"));
        assert!(!debug_str.contains("bytes"));
    }

    #[test]
    fn test_accepts_wildcards_and_extensions() {
        let png_mime = mime::IMAGE_PNG;
        assert!(accepts("image/*", "a.png", &png_mime));
        assert!(accepts("*/*", "a.png", &png_mime));
        assert!(accepts("image/png", "a.png", &png_mime));
        assert!(accepts("image/jpeg, .png", "a.PNG", &png_mime));
        assert!(!accepts("image/jpeg", "a.png", &png_mime));
        assert!(!accepts("image/*", "a.txt", &mime::TEXT_PLAIN));
    }

    #[test]
    fn test_validate_accept() {
        assert!(validate_accept("image/*").is_ok());
        assert!(validate_accept("image/png,.webp").is_ok());
        assert!(validate_accept("").is_err());
        assert!(validate_accept("image").is_err());
        assert!(validate_accept("image/*,.").is_err());
    }

    #[tokio::test]
    async fn test_open_reads_and_detects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, ONE_PIXEL_PNG).unwrap();

        let file = ImageFile::open(&path, &ImageConfig::default()).await.unwrap();
        assert_eq!(file.name(), "pixel.png");
        assert_eq!(file.mime(), &mime::IMAGE_PNG);
        assert_eq!(file.len(), ONE_PIXEL_PNG.len());
    }

    #[tokio::test]
    async fn test_open_rejects_non_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"just text").unwrap();

        let err = ImageFile::open(&path, &ImageConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ImageRejected { .. }));
    }

    #[tokio::test]
    async fn test_open_enforces_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixel.png");
        std::fs::write(&path, ONE_PIXEL_PNG).unwrap();

        let config = ImageConfig {
            max_bytes: 10,
            ..ImageConfig::default()
        };
        let err = ImageFile::open(&path, &config).await.unwrap_err();
        assert!(matches!(err, Error::ImageTooLarge { limit: 10, .. }));
    }

    #[tokio::test]
    async fn test_open_missing_file() {
        let err = ImageFile::open("/nonexistent/pixel.png", &ImageConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ImageRead { .. }));
    }
}
