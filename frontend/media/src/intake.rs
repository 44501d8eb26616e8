//! File intake: read a local image file into an `ActiveImage`.

use std::path::Path;

use cardcheck_core::error::Result;
use cardcheck_core::{ActiveImage, VerifierError};
use image::RgbImage;
use tracing::{debug, info};

use crate::mime_detect::{is_image, sniff_mime_type};

/// Read `path` and encode it as a data URL.
///
/// Only files recognised as images are accepted.
pub async fn read_image_file(path: &Path) -> Result<ActiveImage> {
    let bytes = tokio::fs::read(path).await?;
    let mime = sniff_mime_type(path, &bytes);
    if !is_image(mime) {
        debug!(path = %path.display(), mime, "Rejected non-image file");
        return Err(VerifierError::UnsupportedMedia(format!(
            "{} is not an image ({mime})",
            path.display()
        )));
    }
    info!(path = %path.display(), mime, bytes = bytes.len(), "Loaded image file");
    ActiveImage::from_bytes(mime, &bytes)
}

/// Decode an active image into a thumbnail that fits `max_width`×`max_height`.
///
/// Returns `None` when the payload can't be decoded; the caller falls back to
/// a textual placeholder.
pub fn thumbnail(image: &ActiveImage, max_width: u32, max_height: u32) -> Option<RgbImage> {
    let bytes = image.decode().ok()?;
    let decoded = image::load_from_memory(&bytes).ok()?;
    Some(decoded.thumbnail(max_width.max(1), max_height.max(1)).to_rgb8())
}
